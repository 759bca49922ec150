//! # Lexer - Tokenizing Scrip Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! so concatenating the token texts gives back the source:
//!
//! ```
//! use scrip_syntax::lexer::lex;
//!
//! let input = "## Notes with #Link{a.scrip}\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer doesn't know whether `-` starts a list
//! item or a strikeout, or whether `#` opens a heading; the parser decides.
//! The two exceptions are directive names (`#Link`) and mentions (`@ada`),
//! which are lexed whole so that trailing punctuation stays outside the name.
//!
//! Everything else becomes `TEXT` tokens, grouped into runs of consecutive
//! characters (e.g., "Hello" is one TEXT token, not five).

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it. Each variant maps to a corresponding `SyntaxKind` token.
///
/// [`SyntaxKind`]: crate::syntax_kind::SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"")]
pub enum TokenKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    #[token("#")]
    Hash,

    /// `#Link`, `#AutoNested`, ...
    #[regex(r"#[A-Za-z]+")]
    HashtagName,

    #[regex(r"@[A-Za-z0-9_]+")]
    MentionName,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("_")]
    Underscore,

    #[token("-")]
    Dash,

    #[token("`")]
    Backtick,

    #[token("\"")]
    Quote,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("|")]
    Pipe,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    /// Plain text - anything not matched by other rules
    #[regex(r#"[^\s#@*/_`"{}|\[\]-]+"#)]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Hash => SyntaxKind::HASH,
            TokenKind::HashtagName => SyntaxKind::HASHTAG_NAME,
            TokenKind::MentionName => SyntaxKind::MENTION_NAME,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::Underscore => SyntaxKind::UNDERSCORE,
            TokenKind::Dash => SyntaxKind::DASH,
            TokenKind::Backtick => SyntaxKind::BACKTICK,
            TokenKind::Quote => SyntaxKind::QUOTE,
            TokenKind::LBrace => SyntaxKind::LBRACE,
            TokenKind::RBrace => SyntaxKind::RBRACE,
            TokenKind::Pipe => SyntaxKind::PIPE,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            // Unrecognized input (a lone `@`, a bare `\r`) is plain text
            Err(()) => SyntaxKind::TEXT,
        };
        tokens.push(Token { kind, text });
    }

    tokens
}
