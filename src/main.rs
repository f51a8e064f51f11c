use anyhow::Context;
use clap::Parser;
use cpt_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    let result = commands::run(command).context("CPT processing failed");

    match result {
        Ok(stats) if stats.is_successful() => process::exit(0),
        Ok(_) => process::exit(2),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("CPT Processor - GEF and BRO XML sounding reader");
    println!("===============================================");
    println!();
    println!("Read Cone Penetration Test soundings from GEF files and BRO XML");
    println!("documents into one canonical, quality-checked record.");
    println!();
    println!("USAGE:");
    println!("    cpt-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    read        Read a single CPT file and print the record");
    println!("    batch       Read every CPT file in a directory");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Print a GEF sounding as JSON:");
    println!("    cpt-processor read CPT000001.gef --output json");
    println!();
    println!("    # Only depth and tip, with a 2 m minimum length:");
    println!("    cpt-processor read CPT000000012345.xml --output json --fields depth,tip --min-length 2");
    println!();
    println!("    # Summarize a directory tree:");
    println!("    cpt-processor batch ./soundings --recursive");
    println!();
    println!("For detailed help on any command, use:");
    println!("    cpt-processor <COMMAND> --help");
}
