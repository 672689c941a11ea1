use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use skilltrack_schema::validation::format_validation_errors;
use skilltrack_schema::{
    Cli, Command, LoggingConfig, OutputFormat, ValidationMiddleware, ValidationOutcome,
    ValidatorConfig, create_validation_middleware, init_logging,
};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

const EXIT_INVALID: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run() -> Result<ExitCode> {
    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(logging_config)?;

    let cli = Cli::parse();
    let config = ValidatorConfig::from_args(cli.args)?;

    // Fail fast on a bad allow-list
    config.validate()?;

    let middleware = create_validation_middleware(config.registry_options());

    match cli.command {
        Command::List => {
            for entry in middleware.registry().iter() {
                println!("{:<32} {}", entry.name, entry.description);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Describe { schema } => {
            let json_schema = middleware.registry().json_schema(&schema)?;
            println!("{}", serde_json::to_string_pretty(&json_schema)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { schema, input } => check(&middleware, &config, &schema, &input),
    }
}

fn check(
    middleware: &ValidationMiddleware,
    config: &ValidatorConfig,
    schema: &str,
    input: &Path,
) -> Result<ExitCode> {
    let payload = read_payload(input)?;
    let outcome = middleware.validate(schema, &payload)?;
    let valid = outcome.is_valid();

    match config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => match &outcome {
            ValidationOutcome::Valid(_) => println!("{schema}: valid"),
            ValidationOutcome::Invalid(errors) => {
                println!("{}", format_validation_errors(schema, errors))
            }
        },
    }

    Ok(if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    })
}

fn read_payload(input: &Path) -> Result<Value> {
    let raw = if input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read payload from stdin")?;
        buf
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("failed to read payload {}", input.display()))?
    };
    serde_json::from_str(&raw).context("payload is not valid JSON")
}
