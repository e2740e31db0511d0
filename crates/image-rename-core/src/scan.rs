use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Local};
use globset::{GlobBuilder, GlobMatcher};

use crate::entry::FileEntry;

/// File type sentinel that selects every file.
pub const ALL_FILES: &str = "ALL";

/// Search pattern shown to the user for a file type.
pub fn search_pattern(file_type: &str) -> String {
    if file_type == ALL_FILES {
        "*.*".to_string()
    } else {
        format!("*{}", file_type)
    }
}

/// Matches file names against the search pattern for a file type.
pub struct FileFilter {
    matcher: Option<GlobMatcher>,
}

impl FileFilter {
    pub fn new(file_type: &str) -> anyhow::Result<Self> {
        if file_type == ALL_FILES {
            return Ok(Self { matcher: None });
        }
        let pattern = search_pattern(file_type);
        let glob = GlobBuilder::new(&pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid file type {:?}", file_type))?;
        Ok(Self {
            matcher: Some(glob.compile_matcher()),
        })
    }

    pub fn is_match(&self, file_name: &str) -> bool {
        match &self.matcher {
            Some(m) => m.is_match(file_name),
            None => true,
        }
    }
}

/// List the matching files of `source`, oldest creation time first.
///
/// Only regular files directly inside `source` are returned. The sort is stable, so
/// entries with equal timestamps keep directory order.
pub fn scan_folder(source: &Path, file_type: &str) -> anyhow::Result<Vec<FileEntry>> {
    let filter = FileFilter::new(file_type)?;
    let mut files = Vec::new();

    let entries = fs::read_dir(source)
        .with_context(|| format!("failed to read folder {}", source.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read folder {}", source.display()))?;
        let path = entry.path();
        let name = entry.file_name();
        if !filter.is_match(&name.to_string_lossy()) {
            continue;
        }
        // Follows symlinks, like a directory listing of files would.
        let Ok(meta) = fs::metadata(&path) else {
            log::warn!("Skipping unreadable entry {}", path.display());
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let created = meta
            .created()
            .or_else(|_| meta.modified())
            .with_context(|| format!("no timestamp for {}", path.display()))?;
        files.push(FileEntry::new(path, DateTime::<Local>::from(created)));
    }

    sort_by_creation(&mut files);
    log::debug!(
        "Found {} file(s) matching {} in {}",
        files.len(),
        search_pattern(file_type),
        source.display()
    );
    Ok(files)
}

/// Oldest first. Stable, so equal timestamps keep their listing order.
pub fn sort_by_creation(files: &mut [FileEntry]) {
    files.sort_by_key(|f| f.created);
}
