//! Textsense CLI binary.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;

use textsense::cli::args::TextsenseArgs;
use textsense::cli::commands::execute_command;

fn main() {
    let args = TextsenseArgs::parse();

    Builder::new()
        .filter_level(args.log_level())
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
