use clap::{ArgAction, Parser, ValueEnum};
use json_subset::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

/// Check that one JSON or YAML document is a structural subset of another
#[derive(Parser)]
#[command(name = "json-subset", version)]
struct Cli {
    /// Document holding the fields that must be present
    expected: PathBuf,

    /// Document to check against
    actual: PathBuf,

    /// JSON pointer selecting the part of the expected document to compare
    #[arg(long, default_value = "")]
    expected_at: String,

    /// JSON pointer selecting the part of the actual document to compare
    #[arg(long, default_value = "")]
    actual_at: String,

    /// Input format; detected from the file extension when omitted
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn detect(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(&cli);
    match &result {
        Ok(()) => println!("ok"),
        Err(Error::SubsetError(mismatch)) => eprintln!("{:#}", mismatch),
        Err(otherwise) => eprintln!("{}", otherwise),
    }

    process::exit(exit_code(&result))
}

/// 0 when the subset holds, 1 on a mismatch, 2 when the inputs could not be
/// read or selected.
fn exit_code(result: &Result<(), Error>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(Error::SubsetError(_)) => 1,
        Err(_) => 2,
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let expected = read_document(&cli.expected, cli.format)?;
    let actual = read_document(&cli.actual, cli.format)?;

    let expected = value_at(&expected, &cli.expected_at)?;
    let actual = value_at(&actual, &cli.actual_at)?;

    is_subset(expected, actual)?;
    Ok(())
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_level = match verbose {
        0 => "json_subset=warn",
        1 => "json_subset=debug",
        _ => "json_subset=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn read_document(filename: &Path, format: Option<Format>) -> Result<Value, Error> {
    let format = format.unwrap_or_else(|| Format::detect(filename));
    debug!(path = %filename.display(), ?format, "reading document");

    let contents = fs::read_to_string(filename)?;
    parse_document(&contents, format)
}

fn parse_document(contents: &str, format: Format) -> Result<Value, Error> {
    match format {
        Format::Json => serde_json::from_str(contents).map_err(|v| v.into()),
        Format::Yaml => serde_yaml::from_str(contents).map_err(|v| v.into()),
    }
}
