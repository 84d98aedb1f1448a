use clap::Parser;
use stacked_cli::cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = cli.run() {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}
