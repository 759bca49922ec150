//! # Grammar Rules
//!
//! This module contains the grammar rules that drive parsing. Each function
//! takes a `&mut Parser` and uses its methods to:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`, `p.nth()`)
//! 2. Consume tokens (`p.bump()`, `p.bump_remap()`, `p.eat()`)
//! 3. Build tree structure (`p.start()` → marker → `complete()`)
//!
//! ## Module Structure
//!
//! - [`block`] - Paragraphs and the line-level constructs inside them
//!   (headings, list items, tables, code blocks)
//! - [`inline`] - Inline elements (styling, literals, quotations, directives)
//!
//! ## Error Recovery
//!
//! Grammar functions are lenient: a delimiter without its partner is plain
//! text, an unclosed hashtag parameter list still yields a HASHTAG node (the
//! AST builder reports it). The goal is a valid tree that preserves all bytes.

mod block;
mod inline;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root document.
///
/// A document is a sequence of paragraphs separated by blank lines.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while !p.at_end() {
        if block::at_blank_line(p) {
            block::blank_line(p);
        } else {
            block::paragraph(p);
        }
    }

    m.complete(p, SyntaxKind::ROOT);
}
