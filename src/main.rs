use clap::Parser;
use std::process;
use textted::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(textted::Error::processing_interrupted(
                    "Processing interrupted by user".to_string(),
                ))
            }
        }
    });

    match result {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("textted - TED Procurement Notice Converter");
    println!("==========================================");
    println!();
    println!("Convert mirrored TED (Tenders Electronic Daily) bulk notice archives");
    println!("into JSON records, one object per procurement notice.");
    println!();
    println!("USAGE:");
    println!("    textted <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Convert notices to JSON (main command)");
    println!("    inspect     Report discovered source files per format era");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Convert a mirrored tree to NDJSON on stdout:");
    println!("    textted process /data/ted-mirror > notices.ndjson");
    println!();
    println!("    # Contract award notices only, as a JSON array:");
    println!("    textted process /data/ted-mirror \\");
    println!("        --filter document_document_type_code=7 --output-format json-array");
    println!();
    println!("    # Preview what a mirror contains:");
    println!("    textted inspect /data/ted-mirror");
    println!();
    println!("For detailed help on any command, use:");
    println!("    textted <COMMAND> --help");
}
