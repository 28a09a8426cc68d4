use clap::Parser;
use omc::cli::Cli;
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run() -> omc::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    omc::run_command(cli)
}
