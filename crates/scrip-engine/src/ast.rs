//! The block model: an owned, immutable tree built once per parse.

/// A node in a document's semantic tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(String),
    Heading { level: u8, children: Vec<Block> },
    Bold(Vec<Block>),
    Italics(Vec<Block>),
    Underline(Vec<Block>),
    Strikeout(Vec<Block>),
    /// Code span with its backticks stripped.
    Literal(String),
    CodeBlock(CodeBlock),
    Checkbox { checked: bool },
    /// Always rendered disabled.
    Textbox,
    Quotation(Quotation),
    Hashtag(Hashtag),
    /// Person identifier without the leading `@`.
    Mention(String),
    OrderedItem { ordinal: u32, children: Vec<Block> },
    UnorderedItem(Vec<Block>),
    Table(Table),
}

impl Block {
    pub fn text(text: impl Into<String>) -> Self {
        Block::Text(text.into())
    }
}

/// A fenced code block. `command` names the interpreter; `lines` is the
/// program body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub command: String,
    pub lines: Vec<String>,
}

impl CodeBlock {
    /// Program body joined with newlines.
    pub fn code(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quotation {
    pub text: String,
    /// Text after the last `--`, without the dashes.
    pub author: Option<String>,
}

impl Quotation {
    /// Split raw quoted text at its last `--`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim_matches(|c| matches!(c, ' ' | '\t' | '\r' | '\n' | '"'));

        match trimmed.rfind("--") {
            Some(index) => {
                let author = trimmed[index + 2..].trim();
                let text = trimmed[..index].trim_end();
                Quotation {
                    text: text.to_string(),
                    author: (!author.is_empty()).then(|| author.to_string()),
                }
            }
            None => Quotation {
                text: trimmed.to_string(),
                author: None,
            },
        }
    }
}

/// `#Name` or `#Name{param|param}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hashtag {
    pub name: String,
    pub parameters: Vec<String>,
}

impl Hashtag {
    pub fn new(name: impl Into<String>, parameters: Vec<String>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Source form of the directive, used in error messages.
    pub fn source_text(&self) -> String {
        if self.parameters.is_empty() {
            format!("#{}", self.name)
        } else {
            format!("#{}{{{}}}", self.name, self.parameters.join("|"))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub blocks: Vec<Block>,
}

impl Paragraph {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }
}
