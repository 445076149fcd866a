//! kodeks-convert - Kodeks markup to HTML converter

use std::process::ExitCode;

use clap::Parser;

use kodeks_convert::Converter;

#[derive(Parser)]
#[command(name = "kodeks-convert")]
#[command(version, about = "Convert Kodeks markup to HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    kodeks-convert                          Convert data/sourceDoc.xml to data/test.xml
    kodeks-convert doc.xml doc.html         Convert doc.xml to doc.html

Set RUST_LOG=debug for pipeline details.")]
struct Cli {
    /// Source document in Kodeks markup
    #[arg(value_name = "INPUT", default_value = "data/sourceDoc.xml")]
    input: String,

    /// Converted document
    #[arg(value_name = "OUTPUT", default_value = "data/test.xml")]
    output: String,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match Converter::new().convert_file(&cli.input, &cli.output) {
        Ok(report) => {
            if !cli.quiet {
                println!(
                    "{} -> {} ({} paragraphs, {} bytes)",
                    cli.input, cli.output, report.paragraphs, report.bytes
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
