//! Build-context tarball for `docker build -`.
//!
//! Only what the daemon needs: regular files, uid/gid 0, no directories, names up to 100
//! bytes. Headers are laid out as classic ustar fields (octal text, NUL-terminated).

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::dockerfile::ENTRYPOINT_CONTEXT_PATH;
use crate::util::fs::FileSpec;

const BLOCK: usize = 512;
const NAME_LEN: usize = 100;
const MODE_OFFSET: usize = 100;
const UID_OFFSET: usize = 108;
const GID_OFFSET: usize = 116;
const SIZE_OFFSET: usize = 124;
const MTIME_OFFSET: usize = 136;
const CHECKSUM_OFFSET: usize = 148;
const TYPEFLAG_OFFSET: usize = 156;
const REGULAR_FILE: u8 = b'0';

/// One archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarEntry {
    pub name: String,
    pub data: Vec<u8>,
    pub mode: u32,
}

impl TarEntry {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>, mode: u32) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            mode: mode & 0o777,
        }
    }
}

impl From<&FileSpec> for TarEntry {
    fn from(f: &FileSpec) -> Self {
        TarEntry::new(f.path.clone(), f.data.clone(), f.mode)
    }
}

fn put(header: &mut [u8; BLOCK], offset: usize, bytes: &[u8]) {
    header[offset..offset + bytes.len()].copy_from_slice(bytes);
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn header_for(entry: &TarEntry, mtime: u64) -> [u8; BLOCK] {
    let mut header = [0u8; BLOCK];

    let name = entry.name.as_bytes();
    put(&mut header, 0, &name[..name.len().min(NAME_LEN)]);
    put(&mut header, MODE_OFFSET, format!("{:07o}\0", entry.mode).as_bytes());
    put(&mut header, UID_OFFSET, b"0000000\0");
    put(&mut header, GID_OFFSET, b"0000000\0");
    put(&mut header, SIZE_OFFSET, format!("{:011o}\0", entry.data.len()).as_bytes());
    put(&mut header, MTIME_OFFSET, format!("{mtime:011o}\0").as_bytes());
    header[TYPEFLAG_OFFSET] = REGULAR_FILE;

    // Checksum is computed with the field itself read as eight spaces.
    put(&mut header, CHECKSUM_OFFSET, b"        ");
    let sum: u32 = header.iter().map(|&b| u32::from(b)).sum();
    put(&mut header, CHECKSUM_OFFSET, format!("{sum:06o}\0 ").as_bytes());

    header
}

/// Serialize `entries` in order, followed by two zero blocks.
pub fn create_tar_archive(entries: &[TarEntry]) -> Vec<u8> {
    let mtime = unix_now();
    let total: usize = entries
        .iter()
        .map(|e| BLOCK + e.data.len().div_ceil(BLOCK) * BLOCK)
        .sum::<usize>()
        + 2 * BLOCK;
    let mut out = Vec::with_capacity(total);

    for entry in entries {
        out.extend_from_slice(&header_for(entry, mtime));
        out.extend_from_slice(&entry.data);
        let rem = entry.data.len() % BLOCK;
        if rem != 0 {
            out.resize(out.len() + (BLOCK - rem), 0);
        }
    }

    out.resize(out.len() + 2 * BLOCK, 0);
    out
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or(path)
}

/// Assemble the build context: Dockerfile, pin files, idiomatic files, entrypoint (last).
///
/// Idiomatic files are read from `project_dir` and stored under their base name; ones that
/// vanished or cannot be read are skipped.
pub fn build_docker_context(
    dockerfile: &str,
    tool_file: Option<&FileSpec>,
    mise_file: Option<&FileSpec>,
    idiomatic_paths: &[String],
    project_dir: &Path,
    entrypoint_script: &[u8],
) -> Vec<u8> {
    let mut entries = vec![TarEntry::new("Dockerfile", dockerfile.as_bytes(), 0o644)];

    if let Some(f) = tool_file {
        entries.push(TarEntry::from(f));
    }
    if let Some(f) = mise_file {
        entries.push(TarEntry::from(f));
    }

    for path in idiomatic_paths {
        match std::fs::read(project_dir.join(path)) {
            Ok(data) => entries.push(TarEntry::new(base_name(path), data, 0o644)),
            Err(e) => debug!(path = %path, error = %e, "skipping unreadable idiomatic file"),
        }
    }

    entries.push(TarEntry::new(
        ENTRYPOINT_CONTEXT_PATH,
        entrypoint_script,
        0o755,
    ));

    debug!(
        members = entries.len(),
        names = ?entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        "build context"
    );
    create_tar_archive(&entries)
}
