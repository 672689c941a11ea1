use crate::validation::{RegistryOptions, schema_names};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per field error
    #[default]
    Text,
    /// The `{ok, value}` / `{ok, errors}` document
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub output: OutputFormat,
    pub reject_unknown_keys: bool,
    pub enabled_schemas: Option<HashSet<String>>,
}

impl ValidatorConfig {
    /// Merge CLI/env values over the config file over defaults
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            output: cli_output,
            reject_unknown_keys: cli_reject_unknown_keys,
            enabled_schemas: cli_enabled_schemas,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            output: file_output,
            reject_unknown_keys: file_reject_unknown_keys,
            enabled_schemas: file_enabled_schemas,
        } = file_config;

        let output = cli_output.or(file_output).unwrap_or_default();

        let reject_unknown_keys = cli_reject_unknown_keys
            .or(file_reject_unknown_keys)
            .unwrap_or(false);

        let enabled_schemas = cli_enabled_schemas
            .or(file_enabled_schemas)
            .map(|names| {
                names
                    .into_iter()
                    .map(|name| name.trim().to_ascii_lowercase())
                    .filter(|name| !name.is_empty())
                    .collect::<HashSet<_>>()
            })
            .filter(|set| !set.is_empty());

        Ok(Self {
            output,
            reject_unknown_keys,
            enabled_schemas,
        })
    }

    /// Fail fast on allow-list entries that name no schema
    pub fn validate(&self) -> Result<()> {
        if let Some(enabled) = &self.enabled_schemas {
            let known: HashSet<&str> = schema_names().into_iter().collect();
            let mut unknown: Vec<&str> = enabled
                .iter()
                .map(String::as_str)
                .filter(|name| !known.contains(name))
                .collect();
            unknown.sort_unstable();
            anyhow::ensure!(
                unknown.is_empty(),
                "enabled schemas not recognised: {}",
                unknown.join(", ")
            );
        }
        Ok(())
    }

    pub fn is_schema_enabled(&self, name: &str) -> bool {
        match &self.enabled_schemas {
            Some(set) => set.contains(&name.to_ascii_lowercase()),
            None => true,
        }
    }

    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            reject_unknown_keys: self.reject_unknown_keys,
            enabled: self.enabled_schemas.clone(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "skilltrack-schema",
    about = "Validate learning-platform payloads against their input schemas",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub args: CliArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List registered schema identifiers
    List,
    /// Validate one JSON document
    Check {
        /// Schema identifier, e.g. user.create
        schema: String,
        /// JSON file to validate; `-` reads standard input
        #[arg(long, short, value_name = "FILE", default_value = "-")]
        input: PathBuf,
    },
    /// Print the JSON Schema of a schema's narrowed type
    Describe {
        schema: String,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML, JSON or TOML)",
        global = true
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "SKILLTRACK_SCHEMA_OUTPUT",
        value_enum,
        value_name = "FORMAT",
        help = "Output format for validation results",
        global = true
    )]
    pub output: Option<OutputFormat>,

    #[arg(
        long,
        env = "SKILLTRACK_SCHEMA_REJECT_UNKNOWN_KEYS",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Report undeclared keys instead of stripping them",
        global = true
    )]
    pub reject_unknown_keys: Option<bool>,

    #[arg(
        long,
        env = "SKILLTRACK_SCHEMA_ENABLED",
        value_name = "SCHEMA",
        value_delimiter = ',',
        help = "Restrict validation to the provided schema identifiers",
        global = true
    )]
    pub enabled_schemas: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    output: Option<OutputFormat>,
    reject_unknown_keys: Option<bool>,
    enabled_schemas: Option<Vec<String>>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        "toml" => toml::from_str(&contents)
            .with_context(|| format!("failed to parse TOML config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = ValidatorConfig::from_args(CliArgs::default()).unwrap();
        assert_eq!(config, ValidatorConfig::default());
        assert!(config.is_schema_enabled("user.create"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_enabled_schemas_normalized() {
        let args = CliArgs {
            enabled_schemas: Some(vec![" User.Create ".to_string(), String::new()]),
            ..Default::default()
        };
        let config = ValidatorConfig::from_args(args).unwrap();
        assert!(config.is_schema_enabled("user.create"));
        assert!(!config.is_schema_enabled("user.login"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_enabled_schema_fails_validation() {
        let args = CliArgs {
            enabled_schemas: Some(vec!["user.delete".to_string()]),
            ..Default::default()
        };
        let config = ValidatorConfig::from_args(args).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("user.delete"));
    }

    #[test]
    fn test_missing_config_file() {
        let args = CliArgs {
            config: Some(PathBuf::from("/nonexistent/skilltrack.yaml")),
            ..Default::default()
        };
        assert!(ValidatorConfig::from_args(args).is_err());
    }

    #[test]
    fn test_cli_parses_check_subcommand() {
        let cli = Cli::try_parse_from([
            "skilltrack-schema",
            "check",
            "user.create",
            "--input",
            "payload.json",
            "--output",
            "json",
            "--reject-unknown-keys",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Check {
                schema: "user.create".to_string(),
                input: PathBuf::from("payload.json"),
            }
        );
        assert_eq!(cli.args.output, Some(OutputFormat::Json));
        assert_eq!(cli.args.reject_unknown_keys, Some(true));
    }
}
