mod prompt;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use image_rename_core::{describe_plan, parse_args, resolve_output_folder, ParseOutcome, HELP};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(
    name = "image-rename",
    version,
    about = "Copy files into a folder as <prefix><counter>, oldest first",
    after_help = "Positional arguments: [prefix] [createNewFolder] [sourceFolder] [fileType]. Pass ? for details."
)]
struct Cli {
    /// Up to four values: prefix, create-new-folder flag, source folder, file type
    #[arg(value_name = "ARGS", allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    log::debug!("Arguments: {:?}", cli.args);

    let current_dir = std::env::current_dir()?;
    let config = match parse_args(&cli.args, &current_dir) {
        Ok(ParseOutcome::Proceed(config)) => config,
        Ok(ParseOutcome::Help) => {
            print!("{}", HELP);
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            println!("{}", e);
            print!("{}", HELP);
            return Ok(ExitCode::from(2));
        }
    };

    let dest = resolve_output_folder(&config);
    println!("{}", describe_plan(&config, &dest));

    let mut input = io::stdin().lock();
    if !prompt::confirm(&mut input, &mut io::stdout(), "Do you want to Continue? (Y/N)")? {
        return Ok(ExitCode::SUCCESS);
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} {msg}")
            .unwrap(),
    );
    let result = image_rename_core::run(&config, &dest, &|_stage, current, total, message| {
        pb.set_length(total);
        pb.set_position(current + 1);
        pb.set_message(message.to_string());
    });
    pb.finish_and_clear();

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("\n{}", result);
    prompt::wait_for_key(&mut input)?;
    Ok(ExitCode::SUCCESS)
}
