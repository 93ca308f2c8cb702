//! RFC 3986 reference resolution over raw text.
//!
//! Only the merge and dot-segment removal steps are applied. Everything else in
//! the base and the target (host case, spaces, non-ASCII characters) is copied
//! through as written.

/// A reference split into its five RFC 3986 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Reference<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> Reference<'a> {
    fn split(text: &'a str) -> Self {
        let (rest, fragment) = match text.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (text, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (rest, None),
        };
        let (scheme, rest) = match rest.split_once(':') {
            Some((scheme, tail)) if is_scheme(scheme) => (Some(scheme), tail),
            _ => (None, rest),
        };
        let (authority, path) = match rest.strip_prefix("//") {
            Some(tail) => {
                let end = tail.find('/').unwrap_or(tail.len());
                (Some(&tail[..end]), &tail[end..])
            }
            None => (None, rest),
        };

        Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        }
    }
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

/// Return true when `target` starts with a URI scheme such as `mailto:`.
pub fn has_scheme(target: &str) -> bool {
    Reference::split(target).scheme.is_some()
}

/// Resolve `target` against `base`. `base` may be an absolute URL or a bare
/// path prefix such as `/docs/`. Targets carrying a scheme are returned
/// verbatim.
pub fn resolve_url(base: &str, target: &str) -> String {
    let reference = Reference::split(target);
    if reference.scheme.is_some() {
        return target.to_string();
    }

    let base = Reference::split(base);
    let (authority, path, query) = if reference.authority.is_some() {
        (
            reference.authority,
            remove_dot_segments(reference.path),
            reference.query,
        )
    } else if reference.path.is_empty() {
        (
            base.authority,
            base.path.to_string(),
            reference.query.or(base.query),
        )
    } else if reference.path.starts_with('/') {
        (
            base.authority,
            remove_dot_segments(reference.path),
            reference.query,
        )
    } else {
        (
            base.authority,
            remove_dot_segments(&merge(&base, reference.path)),
            reference.query,
        )
    };

    let mut resolved = String::with_capacity(target.len() + 64);
    if let Some(scheme) = base.scheme {
        resolved.push_str(scheme);
        resolved.push(':');
    }
    if let Some(authority) = authority {
        resolved.push_str("//");
        resolved.push_str(authority);
    }
    resolved.push_str(&path);
    if let Some(query) = query {
        resolved.push('?');
        resolved.push_str(query);
    }
    if let Some(fragment) = reference.fragment {
        resolved.push('#');
        resolved.push_str(fragment);
    }
    resolved
}

fn merge(base: &Reference<'_>, path: &str) -> String {
    if base.authority.is_some() && base.path.is_empty() {
        return format!("/{path}");
    }
    match base.path.rfind('/') {
        Some(idx) => format!("{}{path}", &base.path[..=idx]),
        None => path.to_string(),
    }
}

/// Collapse `.` and `..` segments. `..` never climbs above the root.
fn remove_dot_segments(path: &str) -> String {
    let (absolute, body) = match path.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, path),
    };

    let segments: Vec<&str> = body.split('/').collect();
    let last = segments.len().saturating_sub(1);
    let mut output: Vec<&str> = Vec::with_capacity(segments.len());

    for (idx, segment) in segments.iter().enumerate() {
        match *segment {
            "." => {}
            ".." => {
                output.pop();
            }
            other => {
                output.push(other);
                continue;
            }
        }
        // A trailing dot segment still names a directory.
        if idx == last {
            output.push("");
        }
    }

    let joined = output.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}
