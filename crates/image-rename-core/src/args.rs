use std::path::{Path, PathBuf};

use crate::Configuration;

/// Usage text printed for `?` and after every argument error.
pub const HELP: &str = "\
Help to ImageRename:
--------------------
\t Argument 1: 'File Prefix'
\t\t\tDefault Value: IMG
\t\t\t  Description: Prefix for file name.
\t\t\t    Example 1: ~/Pictures$ image-rename Vegas_

\t Argument 2: 'Create New Folder'
\t\t\tDefault Value: TRUE
\t\t\t  Description: System will not create new folder for renamed images if provided FALSE.

\t Argument 3: 'Path'
\t\t\tDefault Value: Current Folder (Program should be ran from the folder where images reside).
\t\t\t  Description: Provide the path of images folder.
\t\t\t    Example 1: ~/Pictures$ image-rename
\t\t\t    Example 2: /$ image-rename Vegas_ TRUE ~/Pictures

\t Argument 4: 'Type of Files to Rename'
\t\t\tDefault Value: ALL
\t\t\t  Description: Specify Type of File by extension (\".png\" OR \".bmp\" OR \".jpeg\" OR \".mp4\" OR \".dat\")
\t\t\t    Example 1: ~/Pictures$ image-rename Vegas_ TRUE ~/Pictures \".jpg\"
";

/// Maximum number of positional arguments.
pub const MAX_ARGS: usize = 4;

/// What the caller should do after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Proceed(Configuration),
    Help,
}

/// Argument validation failure. Both variants are followed by the help text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    PathNotFound(String),
    ExcessParameters,
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgsError::PathNotFound(path) => write!(
                f,
                "Error: Provided Path \"{}\" does not found on system. Please check help...",
                path
            ),
            ArgsError::ExcessParameters => {
                write!(f, "Provided parameter values more that required. Please check help...")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

/// Apply positional arguments, left to right, on top of the defaults.
///
/// The first position that fails decides the outcome, so `?` wins over any number of
/// trailing arguments and a bad path wins over an excess count.
pub fn parse_args(args: &[String], current_dir: &Path) -> Result<ParseOutcome, ArgsError> {
    let mut config = Configuration::new(current_dir.to_path_buf());

    for (index, arg) in args.iter().enumerate() {
        match index {
            0 => {
                if arg == "?" || arg == "/?" {
                    return Ok(ParseOutcome::Help);
                }
                config.file_prefix = normalize_prefix(arg);
            }
            1 => {
                if arg.eq_ignore_ascii_case("FALSE") {
                    config.create_new_folder = false;
                }
            }
            2 => {
                let path = PathBuf::from(arg);
                if !path.is_dir() {
                    return Err(ArgsError::PathNotFound(arg.clone()));
                }
                config.source_folder = path;
            }
            3 => config.file_type = arg.clone(),
            _ => return Err(ArgsError::ExcessParameters),
        }
    }

    Ok(ParseOutcome::Proceed(config))
}

/// Ensure the prefix ends with exactly the underscore the user gave, or one we add.
pub fn normalize_prefix(prefix: &str) -> String {
    if prefix.ends_with('_') {
        prefix.to_string()
    } else {
        format!("{}_", prefix)
    }
}
