//! Markdown discovery and file I/O.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::Builder;
use walkdir::WalkDir;

use crate::error::{RebaseError, RebaseResult};
use crate::paths::is_markdown_path;

/// Markdown files found under a target path together with the directory that
/// maps onto the global base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Collect Markdown files under `path` in sorted order.
///
/// A file target is its own batch rooted at its parent directory; a directory
/// target is walked recursively.
pub fn discover_markdown_files(path: &Path) -> RebaseResult<Discovery> {
    if !path.exists() {
        return Err(RebaseError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    if path.is_file() {
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let files = if is_markdown_path(path) {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        };
        return Ok(Discovery { root, files });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "Skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_markdown_path(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    Ok(Discovery {
        root: path.to_path_buf(),
        files,
    })
}

/// Read a whole file as UTF-8 text.
pub fn read_markdown(path: &Path) -> RebaseResult<String> {
    let bytes = fs::read(path).map_err(|err| RebaseError::io(path, err))?;
    String::from_utf8(bytes).map_err(|_| RebaseError::InvalidEncoding {
        path: path.to_path_buf(),
    })
}

/// Atomically write the provided string to `path`, ensuring readers never observe
/// partial content. The write is performed via a temporary file in the same
/// directory followed by an atomic rename.
pub fn atomic_write(path: &Path, contents: &str) -> RebaseResult<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut tmp = Builder::new()
        .prefix(".markdown-rebase")
        .tempfile_in(&parent)
        .map_err(|err| RebaseError::io(path, err))?;

    tmp.as_file_mut()
        .write_all(contents.as_bytes())
        .and_then(|_| tmp.as_file_mut().sync_all())
        .map_err(|err| RebaseError::io(path, err))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(path) {
            let perm = metadata.permissions().mode();
            let _ = fs::set_permissions(tmp.path(), fs::Permissions::from_mode(perm));
        }
    }

    tmp.persist(path)
        .map(|_| ())
        .map_err(|err| RebaseError::io(path, err.error))
}
