//! Formula command-line interface

use clap::{ArgAction, Parser, Subcommand};
use crm_formula::cli::output::{ColorChoice, OutputFormat};
use crm_formula::cli::{eval, output, repl, tokens, validate};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Validation-rule formula tool
#[derive(Parser)]
#[command(name = "crm-formula")]
#[command(author, version, about = "Evaluate and test CRM validation-rule formulas", long_about = None)]
struct Cli {
    /// Verbose output (-v for info logs, -vv for debug logs)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Pretty, global = true)]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula against a record
    Eval {
        /// Formula to evaluate
        formula: String,

        /// Record file (JSON object)
        #[arg(short, long)]
        record: Option<PathBuf>,

        /// Record fields (name=value), applied after the record file
        #[arg(long = "field")]
        fields: Vec<String>,

        /// Current time for NOW() and TODAY() (RFC 3339)
        #[arg(long)]
        now: Option<String>,
    },

    /// Show the token stream of a formula
    Tokens {
        /// Formula to tokenize
        formula: String,
    },

    /// Validate records against a rule set
    Validate {
        /// Rule set file (JSON)
        #[arg(short, long)]
        rules: PathBuf,

        /// Record files (JSON objects)
        records: Vec<PathBuf>,

        /// Current time for NOW() and TODAY() (RFC 3339)
        #[arg(long)]
        now: Option<String>,
    },

    /// Start interactive REPL
    Repl {
        /// Record file (JSON object)
        #[arg(short, long)]
        record: Option<PathBuf>,

        /// Current time for NOW() and TODAY() (RFC 3339)
        #[arg(long)]
        now: Option<String>,
    },
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(cli.color);
    init_tracing(cli.verbose);

    let verbose = cli.verbose > 0;

    let result = match cli.command {
        Commands::Eval {
            formula,
            record,
            fields,
            now,
        } => {
            let config = eval::EvalConfig {
                formula,
                record,
                fields,
                now,
                verbose,
                output_format: cli.format,
                output_file: cli.output.clone(),
            };
            eval::eval(config).map(|_| true)
        }

        Commands::Tokens { formula } => {
            let config = tokens::TokensConfig {
                formula,
                output_format: cli.format,
                output_file: cli.output.clone(),
            };
            tokens::tokens(config).map(|()| true)
        }

        Commands::Validate {
            rules,
            records,
            now,
        } => {
            let config = validate::ValidateConfig {
                rules,
                records,
                now,
                verbose,
                output_format: cli.format,
                output_file: cli.output.clone(),
            };
            validate::validate(config)
        }

        Commands::Repl { record, now } => {
            let config = repl::ReplConfig { record, now };
            repl::run(config).map(|()| true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", output::format_error(&e));
            std::process::exit(1);
        }
    }
}
