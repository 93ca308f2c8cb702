use std::path::{Component, Path, PathBuf};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];
const CONVERTED_SUFFIX: &str = "_converted";

/// Return true when `path` carries a Markdown extension. Matching is
/// case-sensitive: `README.MD` is not picked up.
pub fn is_markdown_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| MARKDOWN_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Sibling output path with `_converted` inserted before the extension.
pub fn converted_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}{CONVERTED_SUFFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}{CONVERTED_SUFFIX}"),
    };
    path.with_file_name(file_name)
}

/// Location of `dir` below `root`, rendered as a URL path (`guides/api`).
/// Returns `""` for `root` itself and `None` when `dir` lies outside `root`.
pub fn relative_url_dir(root: &Path, dir: &Path) -> Option<String> {
    dir.strip_prefix(root).ok().map(to_url_path)
}

/// Render a relative path with forward slashes regardless of the host
/// separator. `.` components are dropped; an empty path renders as `""`.
pub fn to_url_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
            other => Some(other.as_os_str().to_string_lossy().into_owned()),
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_extensions_are_case_sensitive() {
        assert!(is_markdown_path(Path::new("docs/guide.md")));
        assert!(is_markdown_path(Path::new("notes.markdown")));
        assert!(!is_markdown_path(Path::new("README.MD")));
        assert!(!is_markdown_path(Path::new("notes.txt")));
        assert!(!is_markdown_path(Path::new("Makefile")));
    }

    #[test]
    fn converted_path_inserts_suffix_before_extension() {
        assert_eq!(
            converted_path(Path::new("docs/guide.md")),
            PathBuf::from("docs/guide_converted.md")
        );
        assert_eq!(
            converted_path(Path::new("a.b.markdown")),
            PathBuf::from("a.b_converted.markdown")
        );
    }

    #[test]
    fn relative_dir_between_nested_directories() {
        assert_eq!(
            relative_url_dir(Path::new("/repo/docs"), Path::new("/repo/docs/guides/api")),
            Some("guides/api".to_string())
        );
    }

    #[test]
    fn relative_dir_of_root_itself_is_empty() {
        assert_eq!(
            relative_url_dir(Path::new("/repo/docs"), Path::new("/repo/docs")),
            Some(String::new())
        );
        assert_eq!(relative_url_dir(Path::new(""), Path::new("")), Some(String::new()));
    }

    #[test]
    fn relative_dir_ignores_leading_current_dir() {
        assert_eq!(
            relative_url_dir(Path::new("."), Path::new("./guides")),
            Some("guides".to_string())
        );
    }

    #[test]
    fn relative_dir_outside_root_is_none() {
        assert_eq!(relative_url_dir(Path::new("/repo/docs"), Path::new("/repo/src")), None);
    }
}
