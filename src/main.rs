use boi::{repl, runner};
use clap::{Arg, Command};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BOI_LOG";

fn main() {
    let matches = Command::new("boi")
        .about("Interpreter for the boi scripting language")
        .arg(
            Arg::new("file")
                .help("The script file to execute, or '-' to read it from stdin")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .value_name("FILTER")
                .help("Tracing filter, overrides the BOI_LOG environment variable"),
        )
        .get_matches();

    init_logging(matches.get_one::<String>("log").map(String::as_str));

    let succeeded = match matches.get_one::<String>("file") {
        Some(path) if !matches.get_flag("interactive") => run_path(path),
        _ => {
            repl::start();
            true
        }
    };

    if !succeeded {
        process::exit(1);
    }
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run_path(path: &str) -> bool {
    if path == "-" {
        let mut source = Vec::new();
        if let Err(e) = io::stdin().read_to_end(&mut source) {
            eprintln!("Error reading stdin: {}", e);
            return false;
        }
        return runner::run_script(&source, Some("<stdin>"));
    }

    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        return false;
    }

    if !path.to_string_lossy().ends_with("boi") {
        eprintln!("Warning: '{}' MUST end with 'boi'", path.display());
    }

    match fs::read(path) {
        Ok(source) => {
            let filename = path.to_string_lossy();
            runner::run_script(&source, Some(filename.as_ref()))
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            false
        }
    }
}
