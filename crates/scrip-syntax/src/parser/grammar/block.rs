//! Paragraph and line-level grammar rules.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::inline;

/// A line holding nothing but whitespace.
pub fn at_blank_line(p: &Parser<'_, '_>) -> bool {
    match p.current() {
        SyntaxKind::NEWLINE => true,
        SyntaxKind::WHITESPACE => matches!(p.nth(1), SyntaxKind::NEWLINE | SyntaxKind::EOF),
        _ => false,
    }
}

/// Consume a blank line as trivia of the enclosing node.
pub fn blank_line(p: &mut Parser<'_, '_>) {
    p.eat(SyntaxKind::WHITESPACE);
    p.eat(SyntaxKind::NEWLINE);
}

/// Parse a paragraph: lines up to the next blank line.
pub fn paragraph(p: &mut Parser<'_, '_>) {
    let m = p.start();

    loop {
        line(p);
        if p.at_end() || at_blank_line(p) {
            break;
        }
    }

    m.complete(p, SyntaxKind::PARAGRAPH);
}

/// Parse one line, dispatching on what starts it.
fn line(p: &mut Parser<'_, '_>) {
    match p.current() {
        SyntaxKind::HASH if heading_level(p).is_some() => heading(p),
        SyntaxKind::DASH | SyntaxKind::STAR if p.nth(1) == SyntaxKind::WHITESPACE => {
            unordered_item(p)
        }
        SyntaxKind::TEXT
            if is_ordered_marker(p.nth_text(0)) && p.nth(1) == SyntaxKind::WHITESPACE =>
        {
            ordered_item(p)
        }
        SyntaxKind::PIPE => table(p),
        SyntaxKind::BACKTICK if is_code_fence(p) => code_block(p),
        _ => {
            inline::inline_until_newline(p);
            p.eat(SyntaxKind::NEWLINE);
        }
    }
}

/// Number of `#` opening a heading, if the line is one.
fn heading_level(p: &Parser<'_, '_>) -> Option<u8> {
    let mut count = 0;
    while p.nth(count) == SyntaxKind::HASH {
        count += 1;
    }

    if count == 0 || p.nth(count) != SyntaxKind::WHITESPACE {
        return None;
    }
    u8::try_from(count).ok()
}

/// `(3).`, `3).` or `3.`
fn is_ordered_marker(text: &str) -> bool {
    let Some(rest) = text.strip_suffix('.') else {
        return false;
    };
    let rest = rest.strip_prefix('(').unwrap_or(rest);
    let rest = rest.strip_suffix(')').unwrap_or(rest);
    !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())
}

fn is_code_fence(p: &Parser<'_, '_>) -> bool {
    (0..3).all(|i| p.nth(i) == SyntaxKind::BACKTICK)
}

/// Parse a heading. The level is the number of `#`.
fn heading(p: &mut Parser<'_, '_>) {
    let Some(level) = heading_level(p) else {
        return;
    };
    let m = p.start();

    p.bump_n(level, SyntaxKind::HEADING_MARKER);
    p.eat(SyntaxKind::WHITESPACE);
    inline::inline_until_newline(p);
    p.eat(SyntaxKind::NEWLINE);

    m.complete(p, SyntaxKind::HEADING);
}

fn unordered_item(p: &mut Parser<'_, '_>) {
    let m = p.start();

    p.bump_remap(SyntaxKind::LIST_MARKER);
    p.eat(SyntaxKind::WHITESPACE);
    inline::inline_until_newline(p);
    p.eat(SyntaxKind::NEWLINE);

    m.complete(p, SyntaxKind::UNORDERED_ITEM);
}

fn ordered_item(p: &mut Parser<'_, '_>) {
    let m = p.start();

    p.bump_remap(SyntaxKind::ORDERED_MARKER);
    p.eat(SyntaxKind::WHITESPACE);
    inline::inline_until_newline(p);
    p.eat(SyntaxKind::NEWLINE);

    m.complete(p, SyntaxKind::ORDERED_ITEM);
}

/// Parse consecutive `| a | b |` lines.
fn table(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while p.at(SyntaxKind::PIPE) {
        table_row(p);
    }

    m.complete(p, SyntaxKind::TABLE);
}

fn table_row(p: &mut Parser<'_, '_>) {
    let m = p.start();

    p.bump_remap(SyntaxKind::DELIMITER);
    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        // Whitespace after the closing pipe is not a cell
        if p.at(SyntaxKind::WHITESPACE) && matches!(p.nth(1), SyntaxKind::NEWLINE | SyntaxKind::EOF)
        {
            p.bump();
            break;
        }
        table_cell(p);
        if p.at(SyntaxKind::PIPE) {
            p.bump_remap(SyntaxKind::DELIMITER);
        }
    }
    p.eat(SyntaxKind::NEWLINE);

    m.complete(p, SyntaxKind::TABLE_ROW);
}

fn table_cell(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !p.at(SyntaxKind::PIPE) {
        inline::inline_element(p);
    }

    m.complete(p, SyntaxKind::TABLE_CELL);
}

/// Parse a fenced code block. The text after the opening fence names the
/// interpreter; everything up to the closing fence is raw.
fn code_block(p: &mut Parser<'_, '_>) {
    let m = p.start();

    p.bump_n(3, SyntaxKind::DELIMITER);
    consume_rest_of_line(p);

    while !p.at_end() {
        if is_code_fence(p) {
            p.bump_n(3, SyntaxKind::DELIMITER);
            while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
                p.bump_remap(SyntaxKind::DELIMITER);
            }
            p.eat(SyntaxKind::NEWLINE);
            break;
        }
        consume_rest_of_line(p);
    }

    m.complete(p, SyntaxKind::CODE_BLOCK);
}

fn consume_rest_of_line(p: &mut Parser<'_, '_>) {
    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        p.bump();
    }
    p.eat(SyntaxKind::NEWLINE);
}
