//! SyntaxKind enum for all tokens and nodes in the Scrip CST.
//!
//! Following the rust-analyzer model, all tokens and nodes share a single enum.
//! Every byte in the source must appear as a token in the tree.

/// All syntax kinds for the Scrip CST.
///
/// This enum represents both tokens (lexer output) and composite nodes (parser output).
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
///
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// Plain text content
    TEXT,
    /// Lone `#`, heading marker material
    HASH,
    /// `#Name` directive name
    HASHTAG_NAME,
    /// `@name` person reference
    MENTION_NAME,
    /// `*` for bold and unordered items
    STAR,
    /// `/` for italics
    SLASH,
    /// `_` for underline and textboxes
    UNDERSCORE,
    /// `-` for strikeout and unordered items
    DASH,
    /// Backtick for literals and code blocks
    BACKTICK,
    /// `"` for quotations
    QUOTE,
    /// `{` opening hashtag parameters
    LBRACE,
    /// `}` closing hashtag parameters
    RBRACE,
    /// `|` for hashtag parameters and table cells
    PIPE,
    /// `[` for checkboxes and textboxes
    LBRACKET,
    /// `]` for checkboxes and textboxes
    RBRACKET,

    // === Remapped tokens (parser output) ===
    /// The `#` run opening a heading
    HEADING_MARKER,
    /// `-` or `*` opening an unordered item
    LIST_MARKER,
    /// `(n).` opening an ordered item
    ORDERED_MARKER,
    /// Opening or closing characters of an inline construct
    DELIMITER,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root document node
    ROOT,
    /// Paragraph: lines up to a blank line
    PARAGRAPH,
    /// `## heading`
    HEADING,
    /// `*bold*`
    BOLD,
    /// `/italics/`
    ITALICS,
    /// `_underline_`
    UNDERLINE,
    /// `-strikeout-`
    STRIKEOUT,
    /// `` `literal` ``
    LITERAL,
    /// Fenced block whose first line names an interpreter
    CODE_BLOCK,
    /// `[x]` or `[ ]`
    CHECKBOX,
    /// `[___]`
    TEXTBOX,
    /// `"quoted text --author"`
    QUOTATION,
    /// `#Name` or `#Name{param|param}`
    HASHTAG,
    /// `{param|param}` part of a hashtag
    PARAMETERS,
    /// `@name`
    MENTION,
    /// `(n). item`
    ORDERED_ITEM,
    /// `- item`
    UNORDERED_ITEM,
    /// Consecutive `| a | b |` lines
    TABLE,
    /// One `| a | b |` line
    TABLE_ROW,
    /// Content between two pipes
    TABLE_CELL,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true for tokens that only carry syntax, never content.
    pub fn is_markup(self) -> bool {
        matches!(
            self,
            Self::HEADING_MARKER | Self::LIST_MARKER | Self::ORDERED_MARKER | Self::DELIMITER
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScripLang {}

impl rowan::Language for ScripLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<ScripLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<ScripLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<ScripLang>;
