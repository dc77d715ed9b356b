//! Filesystem reads for version sources.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An already-read file: logical name, raw bytes and permission bits (masked to 0o777).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    pub path: String,
    pub data: Vec<u8>,
    pub mode: u32,
}

impl FileSpec {
    pub fn new(path: impl Into<String>, data: impl Into<Vec<u8>>, mode: u32) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
            mode: mode & 0o777,
        }
    }

    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

#[cfg(unix)]
fn permission_bits(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn permission_bits(meta: &fs::Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

/// Read `dir/name` if it exists as a file. `Ok(None)` when it is absent; other I/O errors
/// propagate. The returned spec keeps `name` (relative) as its path, since that is the
/// member name used inside the build context.
pub fn optional_file_spec(dir: &Path, name: &str) -> io::Result<Option<FileSpec>> {
    let full: PathBuf = dir.join(name);
    let meta = match fs::metadata(&full) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    if !meta.is_file() {
        return Ok(None);
    }
    let data = fs::read(&full)?;
    Ok(Some(FileSpec::new(name, data, permission_bits(&meta))))
}

/// Read a file to a string, mapping every failure to `None`.
pub fn read_to_string_lossy(path: &Path) -> Option<String> {
    fs::read(path)
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}
