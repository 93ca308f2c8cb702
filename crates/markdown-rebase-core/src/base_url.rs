//! Per-file base URL computation.
//!
//! A document tree is published under a single global base URL. Each file
//! resolves its relative links against that base extended with the file's
//! directory relative to the tree root, so `docs/guides/intro.md` under
//! `https://x.com/docs` resolves against `https://x.com/docs/guides`.

use std::path::Path;

use crate::error::{RebaseError, RebaseResult};
use crate::paths::relative_url_dir;

const GITHUB_HOST: &str = "https://github.com";

/// Strip every trailing `/` from `url`.
pub fn trim_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Base URL for a file living in `file_dir`, where `root_dir` maps onto
/// `global_base_url`. `file_dir` must be `root_dir` or one of its descendants.
pub fn scoped_base_url(global_base_url: &str, file_dir: &Path, root_dir: &Path) -> String {
    let base = trim_trailing_slash(global_base_url);
    let relative = relative_url_dir(root_dir, file_dir).unwrap_or_default();

    if relative.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{relative}")
    }
}

/// Build the GitHub blob URL for `repo` (`owner/name`) at `release`.
///
/// Returns `Ok(None)` when either input is empty so callers can fall back to
/// another base URL source.
pub fn github_base_url(repo: &str, release: &str) -> RebaseResult<Option<String>> {
    if repo.is_empty() || release.is_empty() {
        return Ok(None);
    }

    if !is_repository_reference(repo) {
        return Err(RebaseError::InvalidRepositoryFormat {
            repo: repo.to_string(),
        });
    }

    Ok(Some(format!("{GITHUB_HOST}/{repo}/blob/{release}/")))
}

/// Exactly one `/` separating two non-empty segments.
fn is_repository_reference(repo: &str) -> bool {
    match repo.split_once('/') {
        Some((owner, name)) => !owner.is_empty() && !name.is_empty() && !name.contains('/'),
        None => false,
    }
}
