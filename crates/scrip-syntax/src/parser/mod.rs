//! # Parser - Event-Based Tree Construction
//!
//! This module implements the core parsing logic, transforming a token stream
//! into a syntax tree using the **event-based** architecture from rust-analyzer.
//!
//! Instead of building the tree directly, grammar rules emit a flat list of
//! **events** ([`Event`]) that describe the tree structure. The [`Sink`] then
//! builds the actual Rowan tree from events.
//!
//! ## The Marker System
//!
//! When you call `parser.start()`, you get a [`Marker`]. This marker **must**
//! be completed with `marker.complete(parser, KIND)`, which turns its
//! placeholder into a Start event and emits the matching Finish.
//!
//! Grammar rules check their lookahead before calling `start()`, so there is
//! never a marker to take back. Dropping one uncompleted **panics**.
//!
//! ```ignore
//! let m = parser.start();
//! parser.bump_remap(SyntaxKind::DELIMITER);
//! m.complete(parser, SyntaxKind::BOLD);
//! ```
//!
//! ## Public API
//!
//! The main entry point is [`parse`]:
//!
//! ```
//! use scrip_syntax::parse;
//!
//! let tree = parse("# Hello\n");
//! println!("{:#?}", tree);
//! ```

pub mod event;
pub mod sink;

mod grammar;

use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// The parser state machine.
///
/// Holds the token stream, current position, and accumulated events.
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `nth_text()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `bump_remap()`, `bump_n()`, `eat()`
/// - Build structure: `start()` → `Marker` → `complete()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
        }
    }

    /// Parse the tokens and return a syntax tree.
    pub fn parse(mut self) -> SyntaxNode {
        grammar::root(&mut self);
        let sink = Sink::new(self.tokens, self.events);
        sink.finish()
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Raw kind of the token just consumed, or EOF at the start of input.
    pub fn prev(&self) -> SyntaxKind {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Text of the token n ahead, empty past the end.
    pub fn nth_text(&self, n: usize) -> &'input str {
        self.tokens.get(self.pos + n).map(|t| t.text).unwrap_or("")
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.bump_remap(kind);
        }
    }

    /// Consume the current token, recording it under a different kind.
    pub fn bump_remap(&mut self, kind: SyntaxKind) {
        if !self.at_end() {
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Consume n tokens as a single composite token.
    pub fn bump_n(&mut self, n: u8, kind: SyntaxKind) {
        let n_raw = usize::from(n);
        if n_raw > 0 && self.pos + n_raw <= self.tokens.len() {
            self.events.push(Event::Token {
                kind,
                n_raw_tokens: n,
            });
            self.pos += n_raw;
        }
    }

}

/// A marker for a node being constructed.
///
/// The `#[must_use]` attribute and the `Drop` impl together enforce that
/// every marker is completed.
#[must_use = "Markers must be completed, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::Start { kind };
        p.events.push(Event::Finish);
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be completed");
        }
    }
}

/// Parse Scrip source into a syntax tree.
pub fn parse(source: &str) -> SyntaxNode {
    let tokens = lex(source);
    let parser = Parser::new(&tokens);
    parser.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_empty_input() {
        let tree = parse("");
        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        assert_eq!(tree.children().count(), 0);
    }

    #[test]
    fn parse_preserves_all_text() {
        let input = "Hello, *world*!";
        let tree = parse(input);
        assert_eq!(tree.text(), input);
    }

    #[test]
    fn lookahead_and_lookbehind() {
        let tokens = lex("a b\nc");
        let mut parser = Parser::new(&tokens);
        assert_eq!(parser.prev(), SyntaxKind::EOF);
        assert_eq!(parser.nth_text(2), "b");

        parser.bump();
        assert_eq!(parser.prev(), SyntaxKind::TEXT);
        assert_eq!(parser.current(), SyntaxKind::WHITESPACE);
        assert_eq!(parser.nth(2), SyntaxKind::NEWLINE);
        assert_eq!(parser.nth(10), SyntaxKind::EOF);
    }

    #[test]
    fn marker_must_be_completed() {
        let result = std::panic::catch_unwind(|| {
            let tokens = lex("test");
            let mut parser = Parser::new(&tokens);
            let _marker = parser.start();
        });
        assert!(result.is_err());
    }
}
