mod cli;

use clap::Parser;
use cli::Args;
use std::fs;
use std::process;

fn main() {
    let args = Args::parse();

    let contents = match fs::read_to_string(&args.infile) {
        Ok(contents) => contents,
        Err(source) => {
            eprintln!("error reading {}: {source}", args.infile.display());
            process::exit(1);
        }
    };

    match cli::run(&args, &contents) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
