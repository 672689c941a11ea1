//! Configuration loading: file formats, precedence and allow-list checks.

use clap::Parser;
use serial_test::serial;
use skilltrack_schema::{Cli, CliArgs, Command, OutputFormat, ValidatorConfig};
use std::collections::HashSet;
use std::env;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_yaml_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "skilltrack.yaml",
        "output: json\nreject_unknown_keys: true\nenabled_schemas:\n  - user.create\n  - review.create\n",
    );

    let config = ValidatorConfig::from_args(CliArgs {
        config: Some(path),
        ..Default::default()
    })
    .unwrap();

    assert_eq!(config.output, OutputFormat::Json);
    assert!(config.reject_unknown_keys);
    assert_eq!(
        config.enabled_schemas,
        Some(HashSet::from(["user.create".to_string(), "review.create".to_string()]))
    );
    assert!(config.validate().is_ok());
}

#[test]
fn loads_toml_and_json_configs() {
    let dir = TempDir::new().unwrap();
    let toml_path = write_config(&dir, "skilltrack.toml", "output = \"json\"\n");
    let json_path = write_config(&dir, "skilltrack.json", r#"{"reject_unknown_keys": true}"#);

    let from_toml = ValidatorConfig::from_args(CliArgs {
        config: Some(toml_path),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(from_toml.output, OutputFormat::Json);

    let from_json = ValidatorConfig::from_args(CliArgs {
        config: Some(json_path),
        ..Default::default()
    })
    .unwrap();
    assert!(from_json.reject_unknown_keys);
    assert_eq!(from_json.output, OutputFormat::Text);
}

#[test]
fn rejects_unknown_config_keys_and_extensions() {
    let dir = TempDir::new().unwrap();
    let typo = write_config(&dir, "typo.yaml", "outptu: json\n");
    assert!(
        ValidatorConfig::from_args(CliArgs {
            config: Some(typo),
            ..Default::default()
        })
        .is_err()
    );

    let ini = write_config(&dir, "skilltrack.ini", "output=json\n");
    let err = ValidatorConfig::from_args(CliArgs {
        config: Some(ini),
        ..Default::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("unsupported config extension"));
}

#[test]
fn cli_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "skilltrack.yaml", "output: json\nreject_unknown_keys: true\n");

    let config = ValidatorConfig::from_args(CliArgs {
        config: Some(path),
        output: Some(OutputFormat::Text),
        reject_unknown_keys: Some(false),
        enabled_schemas: None,
    })
    .unwrap();
    assert_eq!(config.output, OutputFormat::Text);
    assert!(!config.reject_unknown_keys);
}

#[test]
fn unknown_allow_list_entry_fails_fast() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "skilltrack.yaml", "enabled_schemas: [user.create, user.erase]\n");
    let config = ValidatorConfig::from_args(CliArgs {
        config: Some(path),
        ..Default::default()
    })
    .unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("user.erase"));
}

#[test]
#[serial]
fn environment_supplies_defaults() {
    unsafe {
        env::set_var("SKILLTRACK_SCHEMA_OUTPUT", "json");
        env::set_var("SKILLTRACK_SCHEMA_ENABLED", "user.login,goal.create");
    }

    let cli = Cli::try_parse_from(["skilltrack-schema", "list"]).unwrap();
    assert_eq!(cli.command, Command::List);
    let config = ValidatorConfig::from_args(cli.args).unwrap();
    assert_eq!(config.output, OutputFormat::Json);
    assert!(config.is_schema_enabled("goal.create"));
    assert!(!config.is_schema_enabled("user.create"));

    unsafe {
        env::remove_var("SKILLTRACK_SCHEMA_OUTPUT");
        env::remove_var("SKILLTRACK_SCHEMA_ENABLED");
    }
}

#[test]
#[serial]
fn flag_beats_environment() {
    unsafe {
        env::set_var("SKILLTRACK_SCHEMA_OUTPUT", "json");
    }
    let cli = Cli::try_parse_from(["skilltrack-schema", "--output", "text", "describe", "user.login"])
        .unwrap();
    assert_eq!(cli.args.output, Some(OutputFormat::Text));
    assert_eq!(
        cli.command,
        Command::Describe {
            schema: "user.login".to_string()
        }
    );
    unsafe {
        env::remove_var("SKILLTRACK_SCHEMA_OUTPUT");
    }
}
