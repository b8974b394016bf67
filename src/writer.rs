//! Persisting merged lists as sorted text files.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::aggregator::AddressSet;
use crate::error::FeedError;

/// Render a set as sorted lines with a trailing newline.
///
/// An empty set renders as a single newline.
pub fn render_list(entries: &AddressSet) -> String {
    let mut sorted: Vec<&str> = entries.iter().map(String::as_str).collect();
    sorted.sort_unstable();

    let mut out = sorted.join("\n");
    out.push('\n');
    out
}

/// Write a list, replacing any existing file at `path`.
///
/// Uses tempfile + rename so readers never see a half-written list.
/// Returns the number of entries written.
pub fn save_list(path: &Path, entries: &AddressSet) -> Result<usize, FeedError> {
    let fs_err = |source: std::io::Error| FeedError::FileSystem {
        path: path.to_path_buf(),
        source,
    };

    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(fs_err)?;
    temp_file
        .write_all(render_list(entries).as_bytes())
        .map_err(fs_err)?;
    temp_file.as_file().sync_all().map_err(fs_err)?;

    // NamedTempFile is created 0600; list files are read by other services.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(temp_file.path(), std::fs::Permissions::from_mode(0o644))
            .map_err(fs_err)?;
    }

    temp_file.persist(path).map_err(|e| fs_err(e.error))?;

    Ok(entries.len())
}
