use clap::Parser;
use colored::Colorize;

use synopsis::cli::{self, Cli};

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = cli::run(cli) {
        if e.is::<cli::Cancelled>() {
            eprintln!("{} Selection cancelled.", "✗".red().bold());
        } else {
            eprintln!("{} {e:#}", "Error:".red().bold());
        }
        std::process::exit(1);
    }
}
