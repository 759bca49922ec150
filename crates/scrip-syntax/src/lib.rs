//! # scrip-syntax
//!
//! A lossless Scrip syntax tree using [Rowan] + [Logos], following the
//! [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## Architecture Overview
//!
//! The parsing pipeline has three stages:
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! The lexer uses [Logos] to tokenize input into a flat sequence of tokens.
//! Every character becomes part of some token - nothing is discarded.
//!
//! ```text
//! "# Hi #Link{a.scrip}\n" → [HASH, WHITESPACE, TEXT("Hi"), WHITESPACE,
//!                           HASHTAG_NAME("#Link"), LBRACE, TEXT, RBRACE, NEWLINE]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The parser consumes tokens and emits **events** (Start, Token, Finish).
//! Grammar rules decide what a token means in context: a `-` may open a list
//! item, a strikeout, or just be a hyphen.
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! The sink consumes events and builds a Rowan green tree using
//! `GreenNodeBuilder`. Composite markers (`###`) are glued into one token here.
//!
//! ## Module Structure
//!
//! ```text
//! scrip-syntax/
//! ├── lib.rs           # This file - public API and tree snapshot tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, public parse() function
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs   # Root document parsing
//!         ├── block.rs # Paragraphs, headings, list items, tables, code blocks
//!         └── inline.rs# Styling, literals, quotations, inputs, directives
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use scrip_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("# Hello\n");
//!
//! // The tree preserves all text
//! assert_eq!(tree.text().to_string(), "# Hello\n");
//!
//! // Headings are lines within a paragraph
//! assert_eq!(tree.kind(), SyntaxKind::ROOT);
//! let paragraph = tree.children().next().unwrap();
//! assert_eq!(paragraph.kind(), SyntaxKind::PARAGRAPH);
//! let heading = paragraph.children().next().unwrap();
//! assert_eq!(heading.kind(), SyntaxKind::HEADING);
//! ```

pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use parser::parse;
pub use syntax_kind::{ScripLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    /// Helper to format a syntax tree for snapshot testing.
    fn format_tree(node: &SyntaxNode, indent: usize) -> String {
        let mut result = String::new();
        let prefix = "  ".repeat(indent);

        result.push_str(&format!(
            "{}{:?}@{:?}\n",
            prefix,
            node.kind(),
            node.text_range()
        ));

        for child in node.children_with_tokens() {
            match child {
                rowan::NodeOrToken::Node(n) => {
                    result.push_str(&format_tree(&n, indent + 1));
                }
                rowan::NodeOrToken::Token(t) => {
                    let text = t.text().replace('\n', "\\n");
                    result.push_str(&format!(
                        "{}  {:?}@{:?} {:?}\n",
                        prefix,
                        t.kind(),
                        t.text_range(),
                        text
                    ));
                }
            }
        }

        result
    }

    #[test]
    fn snapshot_heading_with_bold() {
        let tree = parse("# Hi *there*\n");
        assert_snapshot!(format_tree(&tree, 0), @r###"
        ROOT@0..13
          PARAGRAPH@0..13
            HEADING@0..13
              HEADING_MARKER@0..1 "#"
              WHITESPACE@1..2 " "
              TEXT@2..4 "Hi"
              WHITESPACE@4..5 " "
              BOLD@5..12
                DELIMITER@5..6 "*"
                TEXT@6..11 "there"
                DELIMITER@11..12 "*"
              NEWLINE@12..13 "\\n"
        "###);
    }

    #[test]
    fn snapshot_hashtag_parameters() {
        let tree = parse("#Link{a.scrip|A}\n");
        assert_snapshot!(format_tree(&tree, 0), @r###"
        ROOT@0..17
          PARAGRAPH@0..17
            HASHTAG@0..16
              HASHTAG_NAME@0..5 "#Link"
              PARAMETERS@5..16
                DELIMITER@5..6 "{"
                TEXT@6..13 "a.scrip"
                PIPE@13..14 "|"
                TEXT@14..15 "A"
                DELIMITER@15..16 "}"
            NEWLINE@16..17 "\\n"
        "###);
    }

    #[test]
    fn snapshot_ordered_item() {
        let tree = parse("(3). item\n");
        assert_snapshot!(format_tree(&tree, 0), @r###"
        ROOT@0..10
          PARAGRAPH@0..10
            ORDERED_ITEM@0..10
              ORDERED_MARKER@0..4 "(3)."
              WHITESPACE@4..5 " "
              TEXT@5..9 "item"
              NEWLINE@9..10 "\\n"
        "###);
    }

    // === Error tolerance / messy input tests ===
    // Notes are messy. These test that we produce a valid tree even for
    // garbage input, preserving all bytes.

    #[test]
    fn messy_unclosed_constructs_preserve_text() {
        let input = r#"# Draft notes

Check out #Link{this page for more info

Some *half done emphasis and a stray " quote

And `unclosed literal

```sh
echo never closed
"#;
        let tree = parse(input);
        assert_eq!(tree.text().to_string(), input);
        assert_eq!(tree.kind(), SyntaxKind::ROOT);
    }

    #[test]
    fn messy_real_world_notes_preserve_text() {
        let input = r#"#Meeting notes 2024-01-15
##Action items
- [ ] Call @john about the project
- [x] Review PR #123
* mixed bullet style
  - indented but not nested

| name | role
| a | b | c |

"unterminated quotation --nobody
@ alone and # alone and a_b_c and 2*3*4
"#;
        let tree = parse(input);
        assert_eq!(tree.text().to_string(), input);
    }

    #[test]
    fn roundtrip_preserves_text() {
        let inputs = [
            "Hello, world!\n",
            "# Heading\n",
            "\"Quote --Author\"\n",
            "- Item\n",
            "(1). First\n",
            "```sh\necho hi\n```\n",
            "#Nested{other.scrip}\n",
            "*bold* /italic/ _under_ -strike-\n",
            "`code span`\n",
            "| a | b |\n",
            "[x] [ ] [__]\n",
            "line one\r\nline two\r\n",
        ];

        for input in inputs {
            let tree = parse(input);
            assert_eq!(
                tree.text().to_string(),
                input,
                "Roundtrip failed for: {:?}",
                input
            );
        }
    }
}
