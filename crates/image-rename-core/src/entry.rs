use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Full path of the source file
    pub path: PathBuf,
    /// Creation time (modification time where the filesystem has no birth time)
    pub created: DateTime<Local>,
    /// Suffix from the last '.' inclusive, or empty
    pub extension: String,
}

impl FileEntry {
    pub fn new(path: PathBuf, created: DateTime<Local>) -> Self {
        let extension = original_extension(&path);
        Self {
            path,
            created,
            extension,
        }
    }
}

/// Extension of a file name including the leading dot.
///
/// A name without a dot, or ending in one, has no extension. Dot-files such as
/// `.nomedia` are all extension.
pub fn original_extension(path: &Path) -> String {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return String::new();
    };
    match name.rfind('.') {
        Some(pos) if pos + 1 < name.len() => name[pos..].to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_extension() {
        assert_eq!(original_extension(Path::new("/pics/IMG_0001.JPG")), ".JPG");
        assert_eq!(original_extension(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(original_extension(Path::new("README")), "");
        assert_eq!(original_extension(Path::new("trailing.")), "");
        assert_eq!(original_extension(Path::new(".nomedia")), ".nomedia");
    }
}
