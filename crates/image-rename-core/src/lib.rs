pub mod args;
pub mod copier;
pub mod entry;
pub mod output_folder;
pub mod scan;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

pub use args::{parse_args, ArgsError, ParseOutcome, HELP};
pub use copier::{CopyError, CopyOutcome};
pub use entry::FileEntry;
pub use output_folder::resolve_output_folder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Prefix of every renamed file, normally ending in '_'
    pub file_prefix: String,
    /// Copy into a fresh `{prefix}{n}` folder instead of the source folder
    pub create_new_folder: bool,
    pub source_folder: PathBuf,
    /// Extension such as ".png", or "ALL"
    pub file_type: String,
}

impl Configuration {
    /// Defaults for a run started in `current_dir`.
    pub fn new(current_dir: PathBuf) -> Self {
        Self {
            file_prefix: "IMG".to_string(),
            create_new_folder: true,
            source_folder: current_dir,
            file_type: scan::ALL_FILES.to_string(),
        }
    }

    pub fn search_pattern(&self) -> String {
        scan::search_pattern(&self.file_type)
    }
}

/// Type alias for progress callback: (stage, current, total, message)
pub type ProgressCallback<'a> = dyn Fn(&str, u64, u64, &str) + Send + Sync + 'a;

/// What a run produced.
#[derive(Debug)]
pub enum RunResult {
    /// Nothing matched the search pattern; no folder was created.
    NotFound {
        pattern: String,
        source: PathBuf,
    },
    Copied {
        count: usize,
        source: PathBuf,
        dest: PathBuf,
    },
    /// At least one copy failed. Successful copies are kept.
    Failed { errors: Vec<CopyError> },
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, RunResult::Failed { .. })
    }
}

impl std::fmt::Display for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunResult::NotFound { pattern, source } => write!(
                f,
                "Files with pattern \"{}\" does not found in folder \"{}\"",
                pattern,
                source.display()
            ),
            RunResult::Copied {
                count,
                source,
                dest,
            } => write!(
                f,
                "\nSuccessfully copied {} files from {} to {}",
                count,
                source.display(),
                dest.display()
            ),
            RunResult::Failed { errors } => {
                writeln!(f, "Below errors occurred while copying:")?;
                for e in errors {
                    write!(f, "\n{}", e)?;
                }
                Ok(())
            }
        }
    }
}

/// Summary of what a run will do, shown before asking for confirmation.
pub fn describe_plan(config: &Configuration, dest: &Path) -> String {
    format!(
        "\tFiles of {} type/s in folder {} will be \n\
         \t- Sorted by File Creation DateTime.\n\
         \t- Renamed to {}<Counter>.\n\
         \t- And placed in folder {}",
        config.file_type,
        config.source_folder.display(),
        config.file_prefix,
        dest.display()
    )
}

/// Enumerate, then copy every matching file into `dest` under its new name.
///
/// Per-file failures end up in [`RunResult::Failed`]; only an unreadable source folder
/// or a destination folder that cannot be created is returned as an error.
pub fn run(
    config: &Configuration,
    dest: &Path,
    progress_callback: &ProgressCallback<'_>,
) -> anyhow::Result<RunResult> {
    let files = scan::scan_folder(&config.source_folder, &config.file_type)?;

    if files.is_empty() {
        return Ok(RunResult::NotFound {
            pattern: config.search_pattern(),
            source: config.source_folder.clone(),
        });
    }

    fs::create_dir_all(dest)
        .with_context(|| format!("failed to create folder {}", dest.display()))?;
    log::info!("Copying {} file(s) into {}", files.len(), dest.display());

    let outcome = copier::copy_files(&files, &config.file_prefix, dest, progress_callback);

    if !outcome.errors.is_empty() {
        return Ok(RunResult::Failed {
            errors: outcome.errors,
        });
    }

    Ok(RunResult::Copied {
        count: files.len(),
        source: config.source_folder.clone(),
        dest: dest.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn no_progress(_: &str, _: u64, _: u64, _: &str) {}

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    /// Write files one after another so creation (and modification) times ascend.
    fn create_in_order(dir: &Path, names: &[&str]) {
        for (i, name) in names.iter().enumerate() {
            let path = dir.join(name);
            fs::write(&path, format!("content of {}", name)).unwrap();
            let t = filetime::FileTime::from_unix_time(1_600_000_000 + i as i64 * 60, 0);
            filetime::set_file_times(&path, t, t).unwrap();
            std::thread::sleep(Duration::from_millis(20));
        }
    }

    fn configure(argv: &[&str]) -> Configuration {
        match parse_args(&args(argv), Path::new("/unused")).unwrap() {
            ParseOutcome::Proceed(config) => config,
            ParseOutcome::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn test_vegas_scenario() {
        let root = tempdir().unwrap();
        let source = root.path().join("camera");
        fs::create_dir(&source).unwrap();
        create_in_order(&source, &["z.jpg", "m.png", "a.jpg"]);

        let config = configure(&["Vegas", "TRUE", &source.to_string_lossy()]);
        let dest = resolve_output_folder(&config);
        assert_eq!(dest, root.path().join("Vegas_0"));

        let result = run(&config, &dest, &no_progress).unwrap();
        assert!(result.is_success());
        assert_eq!(
            fs::read_to_string(dest.join("Vegas_1.jpg")).unwrap(),
            "content of z.jpg"
        );
        assert_eq!(
            fs::read_to_string(dest.join("Vegas_2.png")).unwrap(),
            "content of m.png"
        );
        assert_eq!(
            fs::read_to_string(dest.join("Vegas_3.jpg")).unwrap(),
            "content of a.jpg"
        );
        let message = result.to_string();
        assert!(message.contains("Successfully copied 3 files from"));
        assert!(message.ends_with(&format!("to {}", dest.display())));
    }

    #[test]
    fn test_no_matches_creates_nothing() {
        let root = tempdir().unwrap();
        let source = root.path().join("camera");
        fs::create_dir(&source).unwrap();
        create_in_order(&source, &["a.png"]);

        let config = configure(&["Trip", "TRUE", &source.to_string_lossy(), ".jpg"]);
        let dest = resolve_output_folder(&config);
        let result = run(&config, &dest, &no_progress).unwrap();

        assert!(!dest.exists());
        assert_eq!(
            result.to_string(),
            format!(
                "Files with pattern \"*.jpg\" does not found in folder \"{}\"",
                source.display()
            )
        );
    }

    #[test]
    fn test_in_place_collision_keeps_other_copies() {
        let root = tempdir().unwrap();
        let source = root.path().join("camera");
        fs::create_dir(&source).unwrap();
        // The second file already carries the name it would be copied to.
        create_in_order(&source, &["x.jpg", "IMG_2.jpg", "z.png"]);

        let config = configure(&["IMG", "false", &source.to_string_lossy()]);
        let dest = resolve_output_folder(&config);
        assert_eq!(dest, source);

        let result = run(&config, &dest, &no_progress).unwrap();
        match &result {
            RunResult::Failed { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].source, source.join("IMG_2.jpg"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert!(result
            .to_string()
            .starts_with("Below errors occurred while copying:\n\nError: \""));
        assert_eq!(
            fs::read_to_string(source.join("IMG_1.jpg")).unwrap(),
            "content of x.jpg"
        );
        assert_eq!(
            fs::read_to_string(source.join("IMG_3.png")).unwrap(),
            "content of z.png"
        );
    }

    #[test]
    fn test_second_run_picks_next_folder() {
        let root = tempdir().unwrap();
        let source = root.path().join("camera");
        fs::create_dir(&source).unwrap();
        create_in_order(&source, &["a.jpg"]);

        let config = configure(&["Vegas_", "TRUE", &source.to_string_lossy()]);
        let first = resolve_output_folder(&config);
        run(&config, &first, &no_progress).unwrap();
        let second = resolve_output_folder(&config);
        assert_eq!(second, root.path().join("Vegas_1"));
    }

    #[test]
    fn test_describe_plan() {
        let config = Configuration {
            file_prefix: "Vegas_".to_string(),
            create_new_folder: true,
            source_folder: PathBuf::from("/pics"),
            file_type: ".jpg".to_string(),
        };
        let plan = describe_plan(&config, Path::new("/Vegas_0"));
        assert_eq!(
            plan,
            "\tFiles of .jpg type/s in folder /pics will be \n\
             \t- Sorted by File Creation DateTime.\n\
             \t- Renamed to Vegas_<Counter>.\n\
             \t- And placed in folder /Vegas_0"
        );
    }
}
