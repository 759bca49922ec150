//! # Transclusion
//!
//! Hashtag directives that pull other documents into the render:
//!
//! | Directive | Parameters | Effect |
//! |-----------|-----------|--------|
//! | `#Link` | target, optional title | Anchor; a `.scrip` target is compiled to its own `.html` |
//! | `#Image` | source | `<img>` tag |
//! | `#Nested` | target | Target document rendered inline, into the same sink |
//! | `#AutoNested` | none | Links to every subfolder holding an index document, inline |
//!
//! Inline recursion is guarded by the chain of documents in the
//! [`RenderContext`]; re-entering one of them is a
//! [`RenderError::CyclicTransclusion`]. Separate-file compilation happens at
//! most once per source per [`Renderer`], so documents may link to each other.

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::path::Path;

use crate::ast::Hashtag;
use crate::discovery;
use crate::error::RenderError;
use crate::io;
use crate::render::{RenderContext, Renderer, load, locate};
use crate::sandbox::CodeExecutor;

/// A hashtag interpreted as a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    Link { target: &'a str, title: String },
    Image { source: &'a str },
    Nested { target: &'a str },
    AutoNested,
    /// Any other hashtag; rendered as a tag.
    Other,
}

impl<'a> Directive<'a> {
    /// Interpret a hashtag, checking its parameters fit the directive.
    pub fn from_hashtag(hashtag: &'a Hashtag) -> Result<Self, RenderError> {
        let malformed = || RenderError::malformed(hashtag.source_text());
        let params = hashtag.parameters.as_slice();

        let directive = match (hashtag.name.as_str(), params) {
            ("Link", [target]) => Directive::Link {
                target,
                title: default_title(target),
            },
            ("Link", [target, title]) => Directive::Link {
                target,
                title: title.clone(),
            },
            ("Image", [source]) => Directive::Image { source },
            ("Nested", [target]) => Directive::Nested { target },
            ("AutoNested", []) => Directive::AutoNested,
            ("Link" | "Image" | "Nested" | "AutoNested", _) => return Err(malformed()),
            _ => Directive::Other,
        };

        if let Directive::Link { target: "", .. }
        | Directive::Image { source: "" }
        | Directive::Nested { target: "" } = directive
        {
            return Err(malformed());
        }

        Ok(directive)
    }
}

/// Title of a link without one: the target's file stem.
fn default_title(target: &str) -> String {
    Path::new(target)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| target.to_string())
}

impl<E: CodeExecutor> Renderer<E> {
    pub(crate) fn render_hashtag(
        &mut self,
        hashtag: &Hashtag,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        match Directive::from_hashtag(hashtag)? {
            Directive::Link { target, title } => self.render_link(target, &title, ctx),
            Directive::Image { source } => {
                write!(
                    ctx.out,
                    "<img src=\"{}\" />",
                    encode_double_quoted_attribute(source)
                )?;
                Ok(())
            }
            Directive::Nested { target } => self.render_nested(target, ctx),
            Directive::AutoNested => self.render_auto_nested(ctx),
            Directive::Other => {
                write!(
                    ctx.out,
                    "<span class=\"hashtag\">{}</span>",
                    encode_text(&hashtag.source_text())
                )?;
                Ok(())
            }
        }
    }

    fn render_link(
        &mut self,
        target: &str,
        title: &str,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let href = if io::is_markup_target(target) {
            let source = locate(&io::resolve_target(&ctx.base_dir, target))?;
            if self.compiled.contains(&source) {
                log::debug!("{} already compiled", source.display());
            } else {
                self.compile_file(&source)?;
            }
            io::html_target(target)
        } else {
            target.to_string()
        };

        write!(
            ctx.out,
            "<a href=\"{}\">{}</a>",
            encode_double_quoted_attribute(&href),
            encode_text(title)
        )?;
        Ok(())
    }

    fn render_nested(&mut self, target: &str, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        let source = locate(&io::resolve_target(&ctx.base_dir, target))?;
        let mut nested = ctx.nested(&source)?;

        log::debug!("Transcluding {}", source.display());
        let document = load(&source)?;
        self.render_document(&document, &mut nested)
    }

    fn render_auto_nested(&mut self, ctx: &mut RenderContext<'_>) -> Result<(), RenderError> {
        let index_file_name = self.options.index_file_name.clone();
        let folders = discovery::discover_indexed_folders(&ctx.base_dir, &index_file_name)?;
        log::debug!(
            "Found {} indexed folders in {}",
            folders.len(),
            ctx.base_dir.display()
        );

        let document = discovery::index_document(&folders, &index_file_name);
        self.render_document(&document, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::parse_document;
    use crate::render::RenderOptions;
    use crate::tests::{FakeExecutor, create_test_file, create_test_notes_dir};
    use pretty_assertions::assert_eq;

    fn hashtag(name: &str, parameters: &[&str]) -> Hashtag {
        Hashtag::new(name, parameters.iter().map(|p| p.to_string()).collect())
    }

    fn render_in(dir: &Path, source: &str) -> Result<String, RenderError> {
        let document = parse_document(source)?;
        let mut renderer = Renderer::new(FakeExecutor::succeeding(""), RenderOptions::default());
        let mut html = Vec::new();
        let mut ctx = RenderContext::new(&mut html, dir);
        renderer.render_document(&document, &mut ctx)?;
        Ok(String::from_utf8(html).unwrap())
    }

    #[test]
    fn link_title_defaults_to_file_stem() {
        let tag = hashtag("Link", &["notes/today.scrip"]);
        assert_eq!(
            Directive::from_hashtag(&tag).unwrap(),
            Directive::Link {
                target: "notes/today.scrip",
                title: "today".to_string(),
            }
        );
    }

    #[test]
    fn directives_check_parameter_counts() {
        for tag in [
            hashtag("Link", &[]),
            hashtag("Link", &["a", "b", "c"]),
            hashtag("Image", &["a", "b"]),
            hashtag("Nested", &[]),
            hashtag("AutoNested", &["x"]),
            hashtag("Nested", &[""]),
        ] {
            let result = Directive::from_hashtag(&tag);
            assert!(
                matches!(result, Err(RenderError::MalformedDirective { .. })),
                "{} should be malformed",
                tag.source_text()
            );
        }
    }

    #[test]
    fn unknown_hashtags_are_not_directives() {
        assert_eq!(
            Directive::from_hashtag(&hashtag("Todo", &["x"])).unwrap(),
            Directive::Other
        );
    }

    #[test]
    fn external_link_is_a_plain_anchor() {
        let notes_dir = create_test_notes_dir();
        let html = render_in(notes_dir.path(), "#Link{https://example.com?a=1&b=2|Ex}\n").unwrap();
        assert_eq!(
            html,
            "<p><a href=\"https://example.com?a=1&amp;b=2\">Ex</a></p>\n\n"
        );
    }

    #[test]
    fn image_directive() {
        let notes_dir = create_test_notes_dir();
        let html = render_in(notes_dir.path(), "#Image{cat.png}\n").unwrap();
        assert_eq!(html, "<p><img src=\"cat.png\" /></p>\n\n");
    }

    #[test]
    fn link_compiles_target_once() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "notes.scrip", "Linked *page*\n");

        let document = parse_document("#Link{notes.scrip|My Notes} #Link{notes.scrip}\n").unwrap();
        let mut renderer = Renderer::new(FakeExecutor::succeeding(""), RenderOptions::default());
        let mut html = Vec::new();
        let mut ctx = RenderContext::new(&mut html, notes_dir.path());
        renderer.render_document(&document, &mut ctx).unwrap();

        assert_eq!(
            String::from_utf8(html).unwrap(),
            "<p><a href=\"notes.html\">My Notes</a> <a href=\"notes.html\">notes</a></p>\n\n"
        );
        assert_eq!(renderer.compiled.len(), 1);

        let linked = std::fs::read_to_string(notes_dir.path().join("notes.html")).unwrap();
        assert!(linked.contains("<p>Linked <b>page</b></p>"));
    }

    #[test]
    fn link_to_missing_document_fails() {
        let notes_dir = create_test_notes_dir();
        let result = render_in(notes_dir.path(), "#Link{gone.scrip}\n");
        assert!(matches!(result, Err(RenderError::MissingDocument(_))));
    }

    #[test]
    fn nested_renders_into_same_sink() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "part.scrip", "inner *text*\n");

        let html = render_in(notes_dir.path(), "before\n\n#Nested{part.scrip}\n").unwrap();

        assert_eq!(
            html,
            "<p>before</p>\n\n<p><p>inner <b>text</b></p>\n\n</p>\n\n"
        );
        assert!(!notes_dir.path().join("part.html").exists());
    }

    #[test]
    fn nested_resolves_relative_to_nested_file() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "sub/part.scrip", "#Nested{leaf.scrip}\n");
        create_test_file(&notes_dir, "sub/leaf.scrip", "leaf\n");

        let html = render_in(notes_dir.path(), "#Nested{sub/part.scrip}\n").unwrap();

        assert!(html.contains("leaf"));
    }

    #[test]
    fn mutual_nesting_is_cyclic() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "a.scrip", "#Nested{b.scrip}\n");
        create_test_file(&notes_dir, "b.scrip", "#Nested{a.scrip}\n");

        let result = render_in(notes_dir.path(), "#Nested{a.scrip}\n");

        match result {
            Err(RenderError::CyclicTransclusion { path, chain }) => {
                assert!(path.ends_with("a.scrip"));
                assert_eq!(chain.len(), 2);
            }
            other => panic!("expected CyclicTransclusion, got {other:?}"),
        }
    }

    #[test]
    fn repeated_sibling_nesting_is_not_a_cycle() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "part.scrip", "x\n");

        let html = render_in(notes_dir.path(), "#Nested{part.scrip} #Nested{part.scrip}\n").unwrap();

        assert_eq!(html.matches("<p>x</p>").count(), 2);
    }

    #[test]
    fn auto_nested_links_indexed_folders() {
        let notes_dir = create_test_notes_dir();
        create_test_file(&notes_dir, "B/Notes.scrip", "b\n");
        create_test_file(&notes_dir, "A/Notes.scrip", "a\n");
        create_test_file(&notes_dir, "C/readme.txt", "c\n");

        let html = render_in(notes_dir.path(), "#AutoNested\n").unwrap();

        assert_eq!(
            html,
            "<p><p><h2><a href=\"A/Notes.html\">A</a></h2><h2><a href=\"B/Notes.html\">B</a></h2></p>\n\n</p>\n\n"
        );
        assert!(notes_dir.path().join("A/Notes.html").exists());
        assert!(notes_dir.path().join("B/Notes.html").exists());
        assert!(!notes_dir.path().join("C/readme.html").exists());
    }
}
