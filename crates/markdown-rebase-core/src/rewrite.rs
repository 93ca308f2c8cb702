//! Rewrite relative Markdown link targets into absolute URLs.
//!
//! Three lexical shapes are recognised over otherwise unparsed text: inline
//! links, images, and reference definitions at the start of a line. Each shape
//! is handled by its own pass; a pass's output feeds the next one.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::base_url::trim_trailing_slash;
use crate::resolve::resolve_url;

/// Markdown construct carrying a rewritable URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// `[text](target)`
    Inline,
    /// `![alt](target)`
    Image,
    /// `[label]: target "title"` starting at column 0
    ReferenceDefinition,
}

impl LinkKind {
    /// Passes run in this order.
    pub const ALL: [LinkKind; 3] = [
        LinkKind::Inline,
        LinkKind::Image,
        LinkKind::ReferenceDefinition,
    ];

    /// Target prefixes left untouched. Images deliberately omit `mailto:`.
    pub fn excluded_prefixes(self) -> &'static [&'static str] {
        match self {
            LinkKind::Inline | LinkKind::ReferenceDefinition => &["http", "#", "mailto:"],
            LinkKind::Image => &["http", "#"],
        }
    }

    /// Return true if `target` is a relative reference for this construct.
    pub fn should_rewrite(self, target: &str) -> bool {
        !self
            .excluded_prefixes()
            .iter()
            .any(|prefix| target.starts_with(prefix))
    }

    fn pattern(self) -> &'static Regex {
        static INLINE: OnceLock<Regex> = OnceLock::new();
        static IMAGE: OnceLock<Regex> = OnceLock::new();
        static DEFINITION: OnceLock<Regex> = OnceLock::new();

        match self {
            LinkKind::Inline => INLINE.get_or_init(|| {
                Regex::new(r"\[([^\]]+)\]\(([^)\s]+)([ \t][^)\n]*)?\)")
                    .expect("inline link pattern is valid")
            }),
            LinkKind::Image => IMAGE.get_or_init(|| {
                Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)([ \t][^)\n]*)?\)")
                    .expect("image pattern is valid")
            }),
            LinkKind::ReferenceDefinition => DEFINITION.get_or_init(|| {
                Regex::new(r"(?m)^\[([^\]\n]+)\]:[ \t]*(\S+)(.*)$")
                    .expect("reference definition pattern is valid")
            }),
        }
    }
}

/// Outcome of rewriting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub changed: bool,
    pub content: String,
    /// References whose text changed.
    pub rewrites: usize,
}

/// Resolves relative references against a fixed scoped base URL.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    base: String,
}

impl LinkRewriter {
    /// Treat `scoped_base_url` as a directory (a trailing `/` is implied). It
    /// may be an absolute URL or a path prefix such as `/docs`.
    pub fn new(scoped_base_url: &str) -> Self {
        Self {
            base: format!("{}/", trim_trailing_slash(scoped_base_url)),
        }
    }

    /// Run all three passes over `content`.
    pub fn rewrite(&self, content: &str) -> RewriteResult {
        let mut rewrites = 0usize;
        let mut current = content.to_string();

        for kind in LinkKind::ALL {
            current = self.rewrite_pass(&current, kind, &mut rewrites);
        }

        RewriteResult {
            changed: current != content,
            content: current,
            rewrites,
        }
    }

    fn rewrite_pass(&self, content: &str, kind: LinkKind, rewrites: &mut usize) -> String {
        kind.pattern()
            .replace_all(content, |caps: &Captures<'_>| {
                let original = &caps[0];

                if kind == LinkKind::Inline {
                    let start = caps.get(0).map_or(0, |m| m.start());
                    if content[..start].ends_with('!') {
                        return original.to_string();
                    }
                }

                let replacement = self.replace_reference(kind, caps);
                match replacement {
                    Some(text) if text != original => {
                        *rewrites += 1;
                        text
                    }
                    _ => original.to_string(),
                }
            })
            .into_owned()
    }

    fn replace_reference(&self, kind: LinkKind, caps: &Captures<'_>) -> Option<String> {
        let group = |idx: usize| caps.get(idx).map_or("", |m| m.as_str());

        match kind {
            LinkKind::Inline | LinkKind::Image => {
                let (text, target, title) = (group(1), group(2), group(3));
                if !kind.should_rewrite(target) {
                    return None;
                }
                let resolved = resolve_url(&self.base, target);
                let bang = if kind == LinkKind::Image { "!" } else { "" };
                Some(format!("{bang}[{text}]({resolved}{title})"))
            }
            LinkKind::ReferenceDefinition => {
                let (label, target, rest) = (group(1), group(2), group(3));
                if !kind.should_rewrite(target) {
                    return None;
                }
                let resolved = resolve_url(&self.base, target);
                Some(format!("[{label}]: {resolved}{rest}"))
            }
        }
    }
}

/// Rewrite every qualifying reference in `content` against `scoped_base_url`.
pub fn rewrite_links(content: &str, scoped_base_url: &str) -> RewriteResult {
    LinkRewriter::new(scoped_base_url).rewrite(content)
}
