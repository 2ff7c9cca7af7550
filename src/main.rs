use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use marquee::config::{AppConfig, DEFAULT_MOVIE_JSON};
use marquee::menu::Menu;
use marquee::MovieLibrary;

#[derive(Parser, Clone, Debug)]
#[clap(author, version, about = "Keep a personal movie collection in a JSON file", long_about = None)]
struct Args {
    /// JSON document holding the collection. It must already exist.
    #[clap(long, short, env = "MOVIE_JSON", default_value = DEFAULT_MOVIE_JSON)]
    file: PathBuf,

    /// Log more (-v info, -vv debug). Logs go to stderr.
    #[clap(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = AppConfig::resolve(args.file, args.verbose);

    tracing_subscriber::fmt()
    .with_target(false)
    .with_level(true)
    .with_max_level(config.log_level)
    .with_writer(io::stderr)
    .init();

    let mut library = match MovieLibrary::open(&config.movie_json) {
        Ok(library) => library,
        Err(e) => {
            eprintln!("[\u{2717}] {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(&mut library, stdin.lock(), stdout.lock(), config.years);

    match menu.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[\u{2717}] Terminal I/O failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
