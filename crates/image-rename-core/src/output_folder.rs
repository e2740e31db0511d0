use std::path::{Component, Path, PathBuf};

use crate::Configuration;

/// Pick the destination folder for a run.
///
/// Without `create_new_folder` the copies go next to the originals. Otherwise the
/// first free `{prefix}{n}` (n from 0) beside the source folder is used, or inside it
/// when the source is a filesystem root. Nothing is created here.
pub fn resolve_output_folder(config: &Configuration) -> PathBuf {
    if !config.create_new_folder {
        return config.source_folder.clone();
    }

    let base = base_directory(&config.source_folder);
    let mut counter = 0u64;
    loop {
        let candidate = base.join(format!("{}{}", config.file_prefix, counter));
        if !candidate.exists() {
            log::debug!("Resolved output folder {}", candidate.display());
            return candidate;
        }
        counter += 1;
    }
}

/// Parent of the source folder, or the folder itself when it has no parent.
fn base_directory(source: &Path) -> PathBuf {
    let absolute = std::path::absolute(source).unwrap_or_else(|_| source.to_path_buf());
    let absolute = normalize_lexically(&absolute);
    match absolute.parent() {
        Some(parent) => parent.to_path_buf(),
        None => absolute,
    }
}

/// Drop `.` and fold `..` into the preceding component without touching the disk.
///
/// Symlinks are not resolved, so `link/..` is the folder holding `link`.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let at_normal = matches!(last, Some(Component::Normal(_)));
                // ".." of the root is the root.
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                if at_normal {
                    out.pop();
                } else if !at_root {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
