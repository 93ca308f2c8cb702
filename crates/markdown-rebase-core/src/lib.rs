//! Rewrite relative links in a tree of Markdown documents into absolute URLs.

pub mod base_url;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod fs;
pub mod paths;
pub mod resolve;
pub mod rewrite;

pub use base_url::{github_base_url, scoped_base_url, trim_trailing_slash};
pub use config::{BaseUrlOptions, BASE_URL_ENV};
pub use engine::{BatchSummary, FileReport, RebaseOptions, Rebaser};
pub use error::{ExitCode, RebaseError, RebaseResult};
pub use fs::{discover_markdown_files, Discovery};
pub use resolve::{has_scheme, resolve_url};
pub use rewrite::{rewrite_links, LinkKind, LinkRewriter, RewriteResult};
