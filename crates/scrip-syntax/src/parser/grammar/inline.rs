//! # Inline-Level Grammar
//!
//! Inline elements are the styling and directives within a line. Unlike the
//! line-level rules, inline parsing is driven by **special characters**:
//!
//! | Token | Possible Element |
//! |-------|-----------------|
//! | `*` `/` `_` `-` | Bold, italics, underline, strikeout |
//! | `` ` `` | Literal |
//! | `"` | Quotation |
//! | `[` | Checkbox or textbox |
//! | `#Name` | Hashtag directive |
//! | `@name` | Mention |
//! | (other) | Plain text |
//!
//! ## Error Tolerance
//!
//! A styling delimiter only opens when a partner exists later on the same
//! line, and only after whitespace or another opener (so `a/b`, `well-known`
//! and `http://x/y` stay plain text). Unmatched delimiters are consumed as
//! plain text.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse inline content until newline or EOF.
pub fn inline_until_newline(p: &mut Parser<'_, '_>) {
    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        inline_element(p);
    }
}

/// Parse a single inline element.
pub fn inline_element(p: &mut Parser<'_, '_>) {
    match p.current() {
        SyntaxKind::STAR => styled(p, SyntaxKind::STAR, SyntaxKind::BOLD),
        SyntaxKind::SLASH => styled(p, SyntaxKind::SLASH, SyntaxKind::ITALICS),
        SyntaxKind::UNDERSCORE => styled(p, SyntaxKind::UNDERSCORE, SyntaxKind::UNDERLINE),
        SyntaxKind::DASH => styled(p, SyntaxKind::DASH, SyntaxKind::STRIKEOUT),
        SyntaxKind::BACKTICK => raw_span(p, SyntaxKind::BACKTICK, SyntaxKind::LITERAL),
        SyntaxKind::QUOTE => raw_span(p, SyntaxKind::QUOTE, SyntaxKind::QUOTATION),
        SyntaxKind::LBRACKET => input_box(p),
        SyntaxKind::HASHTAG_NAME => hashtag(p),
        SyntaxKind::MENTION_NAME => mention(p),
        _ => p.bump(),
    }
}

/// Lookahead index of the next `delimiter` on this line, if any.
fn closing_on_line(p: &Parser<'_, '_>, delimiter: SyntaxKind) -> Option<usize> {
    let mut i = 1;
    loop {
        match p.nth(i) {
            SyntaxKind::NEWLINE | SyntaxKind::EOF => return None,
            k if k == delimiter => return Some(i),
            _ => i += 1,
        }
    }
}

fn can_open(p: &Parser<'_, '_>, delimiter: SyntaxKind) -> bool {
    let after_boundary = match p.prev() {
        SyntaxKind::EOF
        | SyntaxKind::WHITESPACE
        | SyntaxKind::NEWLINE
        | SyntaxKind::QUOTE
        | SyntaxKind::LBRACE
        | SyntaxKind::PIPE
        | SyntaxKind::LBRACKET => true,
        k @ (SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::UNDERSCORE | SyntaxKind::DASH) => {
            k != delimiter
        }
        _ => false,
    };

    after_boundary
        && !matches!(
            p.nth(1),
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
        )
        && closing_on_line(p, delimiter).is_some()
}

/// Parse `*bold*`, `/italics/`, `_underline_` or `-strikeout-`.
///
/// Content may nest other inline elements but not the same delimiter.
fn styled(p: &mut Parser<'_, '_>, delimiter: SyntaxKind, kind: SyntaxKind) {
    if !can_open(p, delimiter) {
        p.bump();
        return;
    }

    let m = p.start();
    p.bump_remap(SyntaxKind::DELIMITER);

    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !p.at(delimiter) {
        inline_element(p);
    }

    // A nested element may have swallowed the partner; the node stays open-ended
    if p.at(delimiter) {
        p.bump_remap(SyntaxKind::DELIMITER);
    }

    m.complete(p, kind);
}

/// Parse a span whose content is not inline-parsed: `` `literal` `` and
/// `"quotation"`.
fn raw_span(p: &mut Parser<'_, '_>, delimiter: SyntaxKind, kind: SyntaxKind) {
    let Some(close) = closing_on_line(p, delimiter) else {
        p.bump();
        return;
    };

    let m = p.start();
    p.bump_remap(SyntaxKind::DELIMITER);
    for _ in 1..close {
        p.bump();
    }
    p.bump_remap(SyntaxKind::DELIMITER);

    m.complete(p, kind);
}

/// Parse `[x]`, `[ ]` (checkbox) or `[___]` (textbox).
fn input_box(p: &mut Parser<'_, '_>) {
    let is_checkbox = match (p.nth(1), p.nth(2)) {
        (SyntaxKind::WHITESPACE, SyntaxKind::RBRACKET) => true,
        (SyntaxKind::TEXT, SyntaxKind::RBRACKET) => matches!(p.nth_text(1), "x" | "X"),
        _ => false,
    };

    let mut underscores = 0;
    while p.nth(1 + underscores) == SyntaxKind::UNDERSCORE {
        underscores += 1;
    }
    let is_textbox = underscores > 0 && p.nth(1 + underscores) == SyntaxKind::RBRACKET;

    if !is_checkbox && !is_textbox {
        p.bump();
        return;
    }

    let m = p.start();
    p.bump_remap(SyntaxKind::DELIMITER);
    if is_checkbox {
        p.bump();
        p.bump_remap(SyntaxKind::DELIMITER);
        m.complete(p, SyntaxKind::CHECKBOX);
    } else {
        for _ in 0..=underscores {
            p.bump_remap(SyntaxKind::DELIMITER);
        }
        m.complete(p, SyntaxKind::TEXTBOX);
    }
}

/// Parse `#Name` or `#Name{param|param}`.
///
/// An unclosed parameter list runs to the end of the line and still
/// produces a HASHTAG node.
fn hashtag(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();

    if p.at(SyntaxKind::LBRACE) {
        let params = p.start();
        p.bump_remap(SyntaxKind::DELIMITER);
        while !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !p.at(SyntaxKind::RBRACE) {
            p.bump();
        }
        if p.at(SyntaxKind::RBRACE) {
            p.bump_remap(SyntaxKind::DELIMITER);
        }
        params.complete(p, SyntaxKind::PARAMETERS);
    }

    m.complete(p, SyntaxKind::HASHTAG);
}

fn mention(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();
    m.complete(p, SyntaxKind::MENTION);
}
