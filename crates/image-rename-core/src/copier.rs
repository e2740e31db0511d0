use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::entry::FileEntry;
use crate::ProgressCallback;

/// A copy that failed. The batch continues past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyError {
    pub source: PathBuf,
    pub dest_folder: PathBuf,
    pub message: String,
}

impl std::fmt::Display for CopyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Error: \"{}\" occurred while copying file {} to {}",
            self.message,
            self.source.display(),
            self.dest_folder.display()
        )
    }
}

/// Result of the copy phase.
#[derive(Debug, Default)]
pub struct CopyOutcome {
    pub copied: Vec<PathBuf>,
    pub errors: Vec<CopyError>,
}

/// Destination file name for the `index`-th file (1-based).
pub fn dest_file_name(prefix: &str, index: usize, extension: &str) -> String {
    format!("{}{}{}", prefix, index, extension)
}

/// Copy `files` into `dest_folder` as `{prefix}{n}{ext}`, in order.
///
/// The index advances for every file, so a failed copy leaves a gap in the numbering.
/// The destination folder must already exist.
pub fn copy_files(
    files: &[FileEntry],
    prefix: &str,
    dest_folder: &Path,
    progress: &ProgressCallback<'_>,
) -> CopyOutcome {
    let mut outcome = CopyOutcome::default();
    let total = files.len() as u64;

    for (i, file) in files.iter().enumerate() {
        let dest = dest_folder.join(dest_file_name(prefix, i + 1, &file.extension));
        log::debug!(
            "Copying {} (created {}) as {}",
            file.path.display(),
            file.created.format("%Y-%m-%d %H:%M:%S"),
            dest.display()
        );

        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match copy_new(&file.path, &dest) {
            Ok(()) => outcome.copied.push(dest),
            Err(e) => {
                log::warn!("Failed to copy {}: {}", file.path.display(), e);
                outcome.errors.push(CopyError {
                    source: file.path.clone(),
                    dest_folder: dest_folder.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }

        progress("copy", i as u64, total, &name);
    }

    outcome
}

/// Copy bytes and timestamps to `dest`, failing if `dest` already exists.
fn copy_new(src: &Path, dest: &Path) -> io::Result<()> {
    let reader = BufReader::new(File::open(src)?);
    write_new(reader, dest)?;

    if let Ok(meta) = fs::metadata(src) {
        let atime = filetime::FileTime::from_last_access_time(&meta);
        let mtime = filetime::FileTime::from_last_modification_time(&meta);
        filetime::set_file_times(dest, atime, mtime).ok();
    }
    Ok(())
}

/// Stream `reader` into a new file at `dest`.
///
/// An existing `dest` is an error and is left alone. A file this call created is removed
/// again when the copy does not finish.
fn write_new<R: Read>(mut reader: R, dest: &Path) -> io::Result<()> {
    let out = OpenOptions::new().write(true).create_new(true).open(dest)?;

    let written = (|| -> io::Result<()> {
        let mut writer = BufWriter::new(out);
        io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        Ok(())
    })();
    if let Err(e) = written {
        fs::remove_file(dest).ok();
        return Err(e);
    }
    Ok(())
}
