use clap::Parser;
use ibancleaner::output::{ErrorResponse, Response};
use ibancleaner::types::constants::DEFAULT_CONFIG_FILE;
use ibancleaner::{Config, ErrorType, IbanCleaner, Settings};
use std::path::Path;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// IBAN Cleaner - Remove rows with invalid Belgian account numbers
#[derive(Parser, Debug)]
#[command(name = "ibancleaner")]
#[command(about = "Remove rows with invalid Belgian IBAN account numbers from a spreadsheet")]
#[command(
    version,
    after_help = "Tool will write the cleaned spreadsheet next to the input file and print a JSON status document.\nIn case of failure, the document holds an \"Error\" code and nothing is written."
)]
struct Args {
    /// Path to the spreadsheet (xlsx, xls, ods or csv)
    #[arg(short = 'f', long = "filename", required = true)]
    filename: String,

    /// Path of the cleaned file (default: <name>_cleaned.<ext> next to the input)
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Path to config file (default: /etc/ibancleaner.conf)
    #[arg(short = 'c', long = "config")]
    config_file: Option<String>,

    /// Sheet to read (default: first sheet)
    #[arg(long = "sheet")]
    sheet: Option<String>,

    /// Suffix added to the cleaned file name (default: _cleaned)
    #[arg(long = "suffix")]
    suffix: Option<String>,

    /// Directory for the cleaned file (default: the input file's directory)
    #[arg(long = "output-dir")]
    output_dir: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    // Validate file exists
    if !Path::new(&args.filename).exists() {
        exit_with_error(
            ErrorType::Process,
            &args.filename,
            format!("File not found: {}", args.filename),
        );
    }

    let settings = match build_settings(&args) {
        Ok(settings) => settings,
        Err(e) => exit_with_error(ErrorType::Config, &args.filename, e),
    };

    let mut config = Config::new(args.filename).with_settings(settings);
    if let Some(output) = args.output {
        config = config.with_output(output);
    }

    let response = IbanCleaner::new(config).run();
    println!("{}", response.to_json());

    if response.is_error() {
        std::process::exit(1);
    }
}

fn build_settings(args: &Args) -> Result<Settings, String> {
    // Priority: CLI args > config file > environment variables
    let cli = Settings {
        suffix: args.suffix.clone(),
        sheet: args.sheet.clone(),
        output_dir: args.output_dir.clone(),
    };

    let file = match args.config_file {
        Some(ref config_path) => {
            if !Path::new(config_path).exists() {
                return Err(format!("Config file not found: {}", config_path));
            }
            Settings::from_file(config_path)
                .map_err(|e| format!("Failed to load config file {}: {}", config_path, e))?
        }
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Settings::from_file(DEFAULT_CONFIG_FILE).unwrap_or_else(|e| {
                warn!("Ignoring {}: {}", DEFAULT_CONFIG_FILE, e);
                Settings::default()
            })
        }
        None => Settings::default(),
    };

    let env = Settings::from_env().map_err(|e| e.to_string())?;

    Ok(cli.or(file).or(env))
}

fn exit_with_error(error_type: ErrorType, filename: &str, internal: String) -> ! {
    let response = Response::Error(
        ErrorResponse::new(error_type, filename.to_string()).with_internal_message(internal),
    );
    eprintln!("{}", response.to_json());
    std::process::exit(1);
}
