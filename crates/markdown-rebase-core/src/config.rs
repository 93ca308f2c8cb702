//! Resolution of the global base URL.
//!
//! Sources are consulted in order: explicit base URL → repository + release →
//! `BASE_URL` environment variable. The winner is validated and normalised
//! once; everything downstream receives it as a plain value.

use std::env;

use url::{ParseError, Url};

use crate::base_url::{github_base_url, trim_trailing_slash};
use crate::error::{RebaseError, RebaseResult};

pub const BASE_URL_ENV: &str = "BASE_URL";

/// Candidate base URL sources gathered from the caller.
#[derive(Clone, Debug, Default)]
pub struct BaseUrlOptions {
    pub base_url: Option<String>,
    pub repo: Option<String>,
    pub release: Option<String>,
    pub env_base_url: Option<String>,
}

impl BaseUrlOptions {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_repository(mut self, repo: impl Into<String>, release: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self.release = Some(release.into());
        self
    }

    pub fn with_env_base_url(mut self, url: impl Into<String>) -> Self {
        self.env_base_url = Some(url.into());
        self
    }

    /// Capture `BASE_URL` from the process environment.
    pub fn with_env(mut self) -> Self {
        self.env_base_url = env::var(BASE_URL_ENV).ok();
        self
    }

    /// Pick the first available source and return it with trailing slashes
    /// stripped.
    pub fn resolve(&self) -> RebaseResult<String> {
        let candidate = match non_empty(&self.base_url) {
            Some(url) => Some(url.to_string()),
            None => self.repository_url()?,
        };

        let candidate = candidate
            .or_else(|| non_empty(&self.env_base_url).map(str::to_string))
            .ok_or(RebaseError::MissingBaseUrl)?;

        validate(&candidate)?;
        Ok(trim_trailing_slash(&candidate).to_string())
    }

    fn repository_url(&self) -> RebaseResult<Option<String>> {
        match &self.repo {
            Some(repo) => github_base_url(repo, self.release.as_deref().unwrap_or_default()),
            None => Ok(None),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Absolute URLs must parse. Anything without a scheme is a path prefix such
/// as `/docs` and is used as written.
fn validate(url: &str) -> RebaseResult<()> {
    match Url::parse(url) {
        Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => Ok(()),
        Err(source) => Err(RebaseError::InvalidBaseUrl {
            url: url.to_string(),
            source,
        }),
    }
}
