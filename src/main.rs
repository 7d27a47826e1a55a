use clap::Parser;
use elixir_xref::cli::args::Cli;

fn main() {
    let cli = Cli::parse();
    std::process::exit(elixir_xref::cli::run(cli));
}
