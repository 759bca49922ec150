//! # Renderer
//!
//! A depth-first walk over an owned [`Document`] that writes HTML to a sink.
//! Containers write an opening fragment, their children in order, then the
//! matching closing fragment. Leaves write a single fragment.
//!
//! Transclusion directives recurse back into the renderer (see
//! [`crate::transclusion`]): `#Nested` and `#AutoNested` write into the
//! caller's sink, `#Link` compiles its target into a sibling `.html` file.
//!
//! ```
//! use scrip_engine::{RenderContext, RenderOptions, Renderer, parse_document};
//! use scrip_engine::sandbox::ProcessExecutor;
//!
//! let document = parse_document("(3). item\n").unwrap();
//! let mut renderer = Renderer::new(ProcessExecutor::default(), RenderOptions::default());
//!
//! let mut html = Vec::new();
//! let mut ctx = RenderContext::new(&mut html, ".");
//! renderer.render_document(&document, &mut ctx).unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(html).unwrap(),
//!     "<p><ol start=\"3\"><li>item</li></ol></p>\n\n"
//! );
//! ```

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::ast::{Block, CodeBlock, Document, Paragraph, Quotation, Table};
use crate::builder::parse_document;
use crate::error::RenderError;
use crate::io::{self, IoError, STYLESHEET_FILE_NAME};
use crate::sandbox::CodeExecutor;

/// Bootstrap stylesheet linked from every page unless configured otherwise.
pub const DEFAULT_EXTERNAL_STYLESHEET: &str =
    "http://netdna.bootstrapcdn.com/bootstrap/3.0.3/css/bootstrap.min.css";

/// Index document looked for by `#AutoNested`.
pub const DEFAULT_INDEX_FILE_NAME: &str = "Notes.scrip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Stylesheet copied next to each output file. `None` writes the
    /// built-in one.
    pub stylesheet: Option<PathBuf>,
    /// Extra stylesheet hrefs linked from every page.
    pub external_stylesheets: Vec<String>,
    pub index_file_name: String,
    /// HTML-escape what code blocks print.
    pub escape_code_output: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            stylesheet: None,
            external_stylesheets: vec![DEFAULT_EXTERNAL_STYLESHEET.to_string()],
            index_file_name: DEFAULT_INDEX_FILE_NAME.to_string(),
            escape_code_output: true,
        }
    }
}

/// Where a render is writing and which documents it is inside of.
pub struct RenderContext<'a> {
    pub(crate) out: &'a mut dyn Write,
    pub(crate) base_dir: PathBuf,
    /// Documents being rendered into this sink, outermost first.
    pub(crate) visited: Vec<PathBuf>,
}

impl<'a> RenderContext<'a> {
    /// Context for rendering into `out`, resolving relative targets
    /// against `base_dir`.
    pub fn new(out: &'a mut dyn Write, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            out,
            base_dir: base_dir.into(),
            visited: Vec::new(),
        }
    }

    /// Mark `source` as being rendered into this sink.
    pub fn entered(mut self, source: PathBuf) -> Self {
        self.visited.push(source);
        self
    }

    /// Context for a document transcluded at the current position: same
    /// sink, its own base directory, one more entry in the chain.
    pub(crate) fn nested(&mut self, source: &Path) -> Result<RenderContext<'_>, RenderError> {
        if self.visited.iter().any(|visited| visited == source) {
            return Err(RenderError::cyclic(source, &self.visited));
        }

        let base_dir = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.clone());
        let mut visited = self.visited.clone();
        visited.push(source.to_path_buf());

        Ok(RenderContext {
            out: &mut *self.out,
            base_dir,
            visited,
        })
    }
}

/// Renders documents to HTML, running code blocks with `E`.
pub struct Renderer<E> {
    pub(crate) executor: E,
    pub(crate) options: RenderOptions,
    /// Sources already compiled to their own file during this run.
    pub(crate) compiled: HashSet<PathBuf>,
}

impl<E: CodeExecutor> Renderer<E> {
    pub fn new(executor: E, options: RenderOptions) -> Self {
        Self {
            executor,
            options,
            compiled: HashSet::new(),
        }
    }

    /// Compile a source file into the `.html` file beside it, writing the
    /// stylesheet next to it. Returns the output path.
    pub fn compile_file(&mut self, source: &Path) -> Result<PathBuf, RenderError> {
        let source = locate(source)?;
        self.compiled.insert(source.clone());

        let output = io::html_path(&source);
        log::debug!("Compiling {} -> {}", source.display(), output.display());

        let document = load(&source)?;
        let base_dir = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        if let Err(e) = io::write_stylesheet(&base_dir, self.options.stylesheet.as_deref()) {
            log::warn!(
                "Could not write {STYLESHEET_FILE_NAME} to {}: {e}",
                base_dir.display()
            );
        }

        let file = File::create(&output).map_err(IoError::Io)?;
        let mut out = BufWriter::new(file);
        let mut ctx = RenderContext::new(&mut out, base_dir).entered(source);
        self.render_page(&document, &mut ctx)?;
        out.flush()?;

        Ok(output)
    }

    /// Render a full page: envelope around the document body.
    pub fn render_page(
        &mut self,
        document: &Document,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        write!(
            ctx.out,
            "<html><head><link rel=\"stylesheet\" href=\"{STYLESHEET_FILE_NAME}\">"
        )?;
        for href in &self.options.external_stylesheets {
            write!(
                ctx.out,
                "<link href=\"{}\" rel=\"stylesheet\">",
                encode_double_quoted_attribute(href)
            )?;
        }
        write!(ctx.out, "</head><body>")?;
        self.render_document(document, ctx)?;
        write!(ctx.out, "</body></html>")?;
        Ok(())
    }

    /// Render the paragraphs of a document, without the envelope.
    pub fn render_document(
        &mut self,
        document: &Document,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        document
            .paragraphs
            .iter()
            .try_for_each(|paragraph| self.render_paragraph(paragraph, ctx))
    }

    fn render_paragraph(
        &mut self,
        paragraph: &Paragraph,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        if paragraph.is_empty() {
            return Ok(());
        }
        write!(ctx.out, "<p>")?;
        self.render_blocks(&paragraph.blocks, ctx)?;
        write!(ctx.out, "</p>\n\n")?;
        Ok(())
    }

    pub(crate) fn render_blocks(
        &mut self,
        blocks: &[Block],
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        blocks
            .iter()
            .try_for_each(|block| self.render_block(block, ctx))
    }

    fn render_block(&mut self, block: &Block, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        match block {
            Block::Text(text) => write!(ctx.out, "{}", encode_text(text))?,
            Block::Heading { level, children } => {
                if !(1..=6).contains(level) {
                    return Err(RenderError::InvalidHeadingLevel(*level));
                }
                write!(ctx.out, "<h{level}>")?;
                self.render_blocks(children, ctx)?;
                write!(ctx.out, "</h{level}>")?;
            }
            Block::Bold(children) => self.render_wrapped("b", children, ctx)?,
            Block::Italics(children) => self.render_wrapped("i", children, ctx)?,
            Block::Underline(children) => self.render_wrapped("u", children, ctx)?,
            Block::Strikeout(children) => self.render_wrapped("s", children, ctx)?,
            Block::Literal(code) => write!(ctx.out, "<code>{}</code>", encode_text(code))?,
            Block::CodeBlock(code) => self.render_code_block(code, ctx)?,
            Block::Checkbox { checked: true } => write!(
                ctx.out,
                "<input class=\"checkbox\" type=\"checkbox\" checked disabled>"
            )?,
            Block::Checkbox { checked: false } => {
                write!(ctx.out, "<input class=\"checkbox\" type=\"checkbox\" disabled>")?
            }
            Block::Textbox => write!(ctx.out, "<input class=\"textbox\" type=\"text\" disabled>")?,
            Block::Quotation(quotation) => render_quotation(quotation, ctx)?,
            Block::Hashtag(hashtag) => self.render_hashtag(hashtag, ctx)?,
            Block::Mention(name) => {
                write!(ctx.out, "<span class=\"mention\">@{}</span>", encode_text(name))?
            }
            Block::OrderedItem { ordinal, children } => {
                // One list per item so the source numbering is kept
                write!(ctx.out, "<ol start=\"{ordinal}\"><li>")?;
                self.render_blocks(children, ctx)?;
                write!(ctx.out, "</li></ol>")?;
            }
            Block::UnorderedItem(children) => {
                write!(ctx.out, "<ul><li>")?;
                self.render_blocks(children, ctx)?;
                write!(ctx.out, "</li></ul>")?;
            }
            Block::Table(table) => self.render_table(table, ctx)?,
        }
        Ok(())
    }

    fn render_wrapped(
        &mut self,
        tag: &str,
        children: &[Block],
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        write!(ctx.out, "<{tag}>")?;
        self.render_blocks(children, ctx)?;
        write!(ctx.out, "</{tag}>")?;
        Ok(())
    }

    fn render_table(&mut self, table: &Table, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        write!(ctx.out, "<table class=\"table\">")?;
        for row in &table.rows {
            write!(ctx.out, "<tr>")?;
            for cell in &row.cells {
                write!(ctx.out, "<td>")?;
                self.render_blocks(&cell.blocks, ctx)?;
                write!(ctx.out, "</td>")?;
            }
            write!(ctx.out, "</tr>")?;
        }
        write!(ctx.out, "</table>")?;
        Ok(())
    }

    /// Run a code block and inline what it printed. Failures render a
    /// placeholder and the page carries on.
    fn render_code_block(
        &mut self,
        code: &CodeBlock,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        if code.command.is_empty() {
            write!(ctx.out, "<pre><code>{}</code></pre>", encode_text(&code.code()))?;
            return Ok(());
        }

        match self.executor.execute(&code.command, &code.code()) {
            Ok(output) => {
                let stdout = if self.options.escape_code_output {
                    encode_text(&output.stdout)
                } else {
                    output.stdout.as_str().into()
                };
                write!(ctx.out, "<pre><code>{stdout}</code></pre>")?;
            }
            Err(e) => {
                log::warn!("Code block `{}` failed: {e}", code.command);
                write!(
                    ctx.out,
                    "<pre class=\"code-error\"><code>{}</code></pre>",
                    encode_text(&e.to_string())
                )?;
            }
        }
        Ok(())
    }
}

fn render_quotation(quotation: &Quotation, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
    write!(ctx.out, "<blockquote>{}</blockquote>", encode_text(&quotation.text))?;
    if let Some(author) = &quotation.author {
        write!(
            ctx.out,
            "<span class=\"quotation-author\">--{}</span>",
            encode_text(author)
        )?;
    }
    Ok(())
}

/// Canonical path of an existing document.
pub(crate) fn locate(path: &Path) -> Result<PathBuf, RenderError> {
    io::canonical_document(path).map_err(|e| match e {
        IoError::NotFound(path) => RenderError::MissingDocument(path),
        other => other.into(),
    })
}

pub(crate) fn load(path: &Path) -> Result<Document, RenderError> {
    let source = io::read_document(path)?;
    Ok(parse_document(&source)?)
}
