//! Mapping from the lossless syntax tree to the owned block model.
//!
//! Every node kind of the grammar maps to exactly one [`Block`] variant.
//! Delimiter and marker tokens are dropped; runs of the remaining tokens
//! become [`Block::Text`].

use regex::Regex;
use scrip_syntax::{SyntaxElement, SyntaxKind, SyntaxNode, parse};
use std::sync::OnceLock;

use crate::ast::{
    Block, CodeBlock, Document, Hashtag, Paragraph, Quotation, Table, TableCell, TableRow,
};
use crate::error::BuildError;

/// Parse Scrip source straight into a [`Document`].
pub fn parse_document(source: &str) -> Result<Document, BuildError> {
    build_document(&parse(source))
}

/// Build a [`Document`] from a `ROOT` syntax node.
pub fn build_document(root: &SyntaxNode) -> Result<Document, BuildError> {
    let paragraphs = root
        .children()
        .filter(|node| node.kind() == SyntaxKind::PARAGRAPH)
        .map(|node| Ok(Paragraph::new(trimmed(build_children(&node)?))))
        .collect::<Result<Vec<_>, BuildError>>()?;

    Ok(Document::new(paragraphs))
}

/// Build the children of a container node, merging raw tokens into text.
fn build_children(node: &SyntaxNode) -> Result<Vec<Block>, BuildError> {
    let mut blocks = Vec::new();
    let mut text = String::new();

    for element in node.children_with_tokens() {
        match element {
            SyntaxElement::Token(token) => {
                if !token.kind().is_markup() {
                    text.push_str(token.text());
                }
            }
            SyntaxElement::Node(child) => {
                flush_text(&mut text, &mut blocks);
                blocks.push(build_block(&child)?);
            }
        }
    }
    flush_text(&mut text, &mut blocks);

    Ok(blocks)
}

fn flush_text(text: &mut String, blocks: &mut Vec<Block>) {
    if !text.is_empty() {
        blocks.push(Block::Text(std::mem::take(text)));
    }
}

/// Drop leading whitespace of the first text and trailing whitespace
/// (including the line ending) of the last.
fn trimmed(mut blocks: Vec<Block>) -> Vec<Block> {
    if let Some(Block::Text(text)) = blocks.last_mut() {
        text.truncate(text.trim_end().len());
        if text.is_empty() {
            blocks.pop();
        }
    }
    if let Some(Block::Text(text)) = blocks.first_mut() {
        *text = text.trim_start().to_string();
        if text.is_empty() {
            blocks.remove(0);
        }
    }
    blocks
}

/// Concatenated text of all non-markup tokens below `node`.
fn content_text(node: &SyntaxNode) -> String {
    node.descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !token.kind().is_markup())
        .map(|token| token.text().to_string())
        .collect()
}

fn marker_text(node: &SyntaxNode, kind: SyntaxKind) -> Option<String> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == kind)
        .map(|token| token.text().to_string())
}

fn build_block(node: &SyntaxNode) -> Result<Block, BuildError> {
    let block = match node.kind() {
        SyntaxKind::HEADING => Block::Heading {
            level: heading_level(node)?,
            children: trimmed(build_children(node)?),
        },
        SyntaxKind::BOLD => Block::Bold(build_children(node)?),
        SyntaxKind::ITALICS => Block::Italics(build_children(node)?),
        SyntaxKind::UNDERLINE => Block::Underline(build_children(node)?),
        SyntaxKind::STRIKEOUT => Block::Strikeout(build_children(node)?),
        SyntaxKind::LITERAL => Block::Literal(content_text(node)),
        SyntaxKind::CODE_BLOCK => Block::CodeBlock(build_code_block(node)),
        SyntaxKind::CHECKBOX => Block::Checkbox {
            checked: content_text(node).trim().eq_ignore_ascii_case("x"),
        },
        SyntaxKind::TEXTBOX => Block::Textbox,
        SyntaxKind::QUOTATION => Block::Quotation(Quotation::parse(&content_text(node))),
        SyntaxKind::HASHTAG => Block::Hashtag(build_hashtag(&node.text().to_string())?),
        SyntaxKind::MENTION => {
            let text = node.text().to_string();
            Block::Mention(text.strip_prefix('@').unwrap_or(&text).to_string())
        }
        SyntaxKind::ORDERED_ITEM => Block::OrderedItem {
            ordinal: ordinal(node)?,
            children: trimmed(build_children(node)?),
        },
        SyntaxKind::UNORDERED_ITEM => Block::UnorderedItem(trimmed(build_children(node)?)),
        SyntaxKind::TABLE => Block::Table(build_table(node)?),
        _ => Block::Text(node.text().to_string()),
    };

    Ok(block)
}

fn heading_level(node: &SyntaxNode) -> Result<u8, BuildError> {
    let marker = marker_text(node, SyntaxKind::HEADING_MARKER).unwrap_or_default();
    let malformed = || BuildError::MalformedMarker {
        marker: "heading",
        text: marker.clone(),
    };

    if marker.is_empty() || !marker.chars().all(|c| c == '#') {
        return Err(malformed());
    }
    u8::try_from(marker.len()).map_err(|_| malformed())
}

/// `(3).`, `3).` and `3.` all give 3.
fn ordinal(node: &SyntaxNode) -> Result<u32, BuildError> {
    let marker = marker_text(node, SyntaxKind::ORDERED_MARKER).unwrap_or_default();

    marker
        .trim_matches(|c| matches!(c, '(' | ')' | '.' | ' '))
        .parse()
        .map_err(|_| BuildError::MalformedMarker {
            marker: "ordered item",
            text: marker.clone(),
        })
}

fn hashtag_regex() -> &'static Regex {
    static HASHTAG_REGEX: OnceLock<Regex> = OnceLock::new();
    HASHTAG_REGEX.get_or_init(|| {
        Regex::new(r"^#([A-Za-z]+)(?:\{(.+)\})?$").expect("Invalid hashtag regex")
    })
}

fn build_hashtag(text: &str) -> Result<Hashtag, BuildError> {
    let captures = hashtag_regex()
        .captures(text)
        .ok_or_else(|| BuildError::MalformedDirective {
            directive: text.to_string(),
        })?;

    let name = captures[1].to_string();
    let parameters = captures
        .get(2)
        .map(|params| {
            params
                .as_str()
                .split('|')
                .map(|param| param.trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    Ok(Hashtag { name, parameters })
}

fn build_code_block(node: &SyntaxNode) -> CodeBlock {
    let mut body = String::new();
    let mut fences = 0;

    for token in node
        .children_with_tokens()
        .filter_map(|element| element.into_token())
    {
        if token.kind() == SyntaxKind::DELIMITER {
            fences += 1;
            if fences > 1 {
                break;
            }
            continue;
        }
        body.push_str(token.text());
    }

    let mut lines = body.lines();
    let command = lines.next().unwrap_or_default().trim().to_string();
    let lines = lines.map(|line| line.trim_end().to_string()).collect();

    CodeBlock { command, lines }
}

fn build_table(node: &SyntaxNode) -> Result<Table, BuildError> {
    let rows = node
        .children()
        .filter(|row| row.kind() == SyntaxKind::TABLE_ROW)
        .map(|row| {
            let cells = row
                .children()
                .filter(|cell| cell.kind() == SyntaxKind::TABLE_CELL)
                .map(|cell| {
                    Ok(TableCell {
                        blocks: trimmed(build_children(&cell)?),
                    })
                })
                .collect::<Result<Vec<_>, BuildError>>()?;
            Ok(TableRow { cells })
        })
        .collect::<Result<Vec<_>, BuildError>>()?;

    Ok(Table { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn blocks(source: &str) -> Vec<Block> {
        let mut document = parse_document(source).unwrap();
        assert_eq!(document.paragraphs.len(), 1, "expected one paragraph");
        document.paragraphs.remove(0).blocks
    }

    #[test]
    fn plain_text_is_trimmed() {
        assert_eq!(blocks("  hello world  \n"), vec![Block::text("hello world")]);
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let document = parse_document("one\n\ntwo\n").unwrap();
        assert_eq!(
            document,
            Document::new(vec![
                Paragraph::new(vec![Block::text("one")]),
                Paragraph::new(vec![Block::text("two")]),
            ])
        );
    }

    #[test]
    fn heading_level_counts_markers() {
        assert_eq!(
            blocks("### Third *level*\n"),
            vec![Block::Heading {
                level: 3,
                children: vec![
                    Block::text("Third "),
                    Block::Bold(vec![Block::text("level")])
                ],
            }]
        );
    }

    #[test]
    fn heading_level_beyond_six_is_kept() {
        let built = blocks("####### deep\n");
        assert!(matches!(built[0], Block::Heading { level: 7, .. }));
    }

    #[test]
    fn styles_strip_delimiters() {
        assert_eq!(
            blocks("/it/ _un_ -st- `a*b`\n"),
            vec![
                Block::Italics(vec![Block::text("it")]),
                Block::text(" "),
                Block::Underline(vec![Block::text("un")]),
                Block::text(" "),
                Block::Strikeout(vec![Block::text("st")]),
                Block::text(" "),
                Block::Literal("a*b".to_string()),
            ]
        );
    }

    #[test]
    fn ordered_item_ordinal() {
        assert_eq!(
            blocks("(3). item\n"),
            vec![Block::OrderedItem {
                ordinal: 3,
                children: vec![Block::text("item")],
            }]
        );
        assert!(matches!(
            blocks("12. twelve\n")[0],
            Block::OrderedItem { ordinal: 12, .. }
        ));
    }

    #[test]
    fn list_items_each_become_blocks() {
        assert_eq!(
            blocks("- one\n- two\n"),
            vec![
                Block::UnorderedItem(vec![Block::text("one")]),
                Block::UnorderedItem(vec![Block::text("two")]),
            ]
        );
    }

    #[test]
    fn code_block_command_and_lines() {
        assert_eq!(
            blocks("```python\nprint(1+1)\n    indented  \n```\n"),
            vec![Block::CodeBlock(CodeBlock {
                command: "python".to_string(),
                lines: vec!["print(1+1)".to_string(), "    indented".to_string()],
            })]
        );
    }

    #[test]
    fn inputs() {
        assert_eq!(
            blocks("[x] [ ] [__]\n"),
            vec![
                Block::Checkbox { checked: true },
                Block::text(" "),
                Block::Checkbox { checked: false },
                Block::text(" "),
                Block::Textbox,
            ]
        );
    }

    #[test]
    fn quotation_author() {
        assert_eq!(
            blocks("\"Be bold. --Anon\"\n"),
            vec![Block::Quotation(Quotation {
                text: "Be bold.".to_string(),
                author: Some("Anon".to_string()),
            })]
        );
    }

    #[test]
    fn hashtag_parameters_split_on_pipe() {
        assert_eq!(
            blocks("#Link{notes.scrip|My Notes}\n"),
            vec![Block::Hashtag(Hashtag::new(
                "Link",
                vec!["notes.scrip".to_string(), "My Notes".to_string()]
            ))]
        );
        assert_eq!(
            blocks("#AutoNested\n"),
            vec![Block::Hashtag(Hashtag::new("AutoNested", vec![]))]
        );
    }

    #[test]
    fn unclosed_hashtag_is_malformed() {
        let result = parse_document("#Link{notes.scrip\n");
        match result {
            Err(BuildError::MalformedDirective { directive }) => {
                assert_eq!(directive, "#Link{notes.scrip");
            }
            other => panic!("expected MalformedDirective, got {other:?}"),
        }
    }

    #[test]
    fn empty_parameters_are_malformed() {
        assert!(matches!(
            parse_document("#Nested{}\n"),
            Err(BuildError::MalformedDirective { .. })
        ));
    }

    #[test]
    fn mention_drops_at_sign() {
        assert_eq!(
            blocks("ask @ada\n"),
            vec![Block::text("ask "), Block::Mention("ada".to_string())]
        );
    }

    #[test]
    fn table_cells_hold_blocks() {
        assert_eq!(
            blocks("| a | *b* |\n| c | d |\n"),
            vec![Block::Table(Table {
                rows: vec![
                    TableRow {
                        cells: vec![
                            TableCell {
                                blocks: vec![Block::text("a")]
                            },
                            TableCell {
                                blocks: vec![Block::Bold(vec![Block::text("b")])]
                            },
                        ],
                    },
                    TableRow {
                        cells: vec![
                            TableCell {
                                blocks: vec![Block::text("c")]
                            },
                            TableCell {
                                blocks: vec![Block::text("d")]
                            },
                        ],
                    },
                ],
            })]
        );
    }

    #[test]
    fn lines_keep_their_breaks_inside_a_paragraph() {
        assert_eq!(
            blocks("# Title\nbody text\n## Sub\n"),
            vec![
                Block::Heading {
                    level: 1,
                    children: vec![Block::text("Title")],
                },
                Block::text("body text\n"),
                Block::Heading {
                    level: 2,
                    children: vec![Block::text("Sub")],
                },
            ]
        );
    }
}
