use std::path::PathBuf;

use clap::Parser;

/// A kanban task board in the terminal
#[derive(Parser, Debug)]
#[command(name = "td", version, about)]
struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(short = 'C', long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = taskdeck::tui::run(cli.data_dir.as_deref()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
