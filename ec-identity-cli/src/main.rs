//! Command-line interface for ec-identity
//! Checks cedula and RUC numbers against the configured checksum pipelines.
//!
//! Usage:
//!   ec-identity `<profile>` `<value>`... [--config `<file>`] [--set `<key=value>`]...
//!   ec-identity --list-profiles
//!
//! Exit status is 0 when every value is valid, 1 when any value is invalid and
//! 2 when the configuration cannot be loaded.

use clap::{Arg, ArgAction, Command};
use ec_identity::{Profile, Profiles, Verdict};
use ec_identity_config::Loader;
use serde::Serialize;
use std::process::ExitCode;

const EXIT_INVALID: u8 = 1;
const EXIT_CONFIG: u8 = 2;

/// One line of the JSON report
#[derive(Debug, Serialize)]
struct Report<'a> {
    profile: &'a str,
    value: &'a str,
    valid: bool,
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<String>,
}

fn build_cli() -> Command {
    Command::new("ec-identity")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate Ecuadorian identity numbers")
        .arg_required_else_help(true)
        .arg(
            Arg::new("profile")
                .help("Document profile (ci, ruc-natural)")
                .required_unless_present("list-profiles")
                .index(1),
        )
        .arg(
            Arg::new("values")
                .help("Values to validate")
                .required_unless_present("list-profiles")
                .num_args(1..)
                .index(2),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .short('s')
                .help("Override one property, e.g. ci.coefficient-list=2,1,2")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .help("Show the final document of each run")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-profiles")
                .long("list-profiles")
                .help("List available profiles")
                .action(ArgAction::SetTrue),
        )
}

fn main() -> ExitCode {
    env_logger::init();
    let matches = build_cli().get_matches();

    if matches.get_flag("list-profiles") {
        handle_list_profiles_command();
        return ExitCode::SUCCESS;
    }

    let profile = match matches
        .get_one::<String>("profile")
        .map(|name| name.parse::<Profile>())
    {
        Some(Ok(profile)) => profile,
        Some(Err(e)) => {
            eprintln!("{}", e);
            eprintln!("\nAvailable profiles:");
            for profile in Profile::ALL {
                eprintln!("  {}", profile);
            }
            return ExitCode::from(EXIT_CONFIG);
        }
        None => return ExitCode::from(EXIT_CONFIG),
    };

    let overrides: Vec<&String> = matches
        .get_many::<String>("set")
        .map(|values| values.collect())
        .unwrap_or_default();
    let profiles = match load_profiles(matches.get_one::<String>("config"), &overrides) {
        Ok(profiles) => profiles,
        Err(message) => {
            eprintln!("Configuration error: {}", message);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let values: Vec<&String> = matches
        .get_many::<String>("values")
        .map(|values| values.collect())
        .unwrap_or_default();
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let trace = matches.get_flag("trace");

    let all_valid = handle_validate_command(&profiles, profile, &values, format, trace);
    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_INVALID)
    }
}

/// Layer the optional file and `key=value` overrides over the defaults
fn load_profiles(config: Option<&String>, overrides: &[&String]) -> Result<Profiles, String> {
    let mut loader = Loader::new();
    if let Some(path) = config {
        loader = loader.with_file(path);
    }
    for entry in overrides {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| format!("override '{}' is not of the form key=value", entry))?;
        loader = loader
            .set_override(key.trim(), value.trim())
            .map_err(|e| e.to_string())?;
    }
    let config = loader.build().map_err(|e| e.to_string())?;
    Profiles::from_config(&config).map_err(|e| e.to_string())
}

/// Validate every value, print the results and report whether all passed
fn handle_validate_command(
    profiles: &Profiles,
    profile: Profile,
    values: &[&String],
    format: &str,
    trace: bool,
) -> bool {
    let validator = profiles.get(profile);
    let verdicts: Vec<(&str, Verdict)> = values
        .iter()
        .map(|value| (value.as_str(), validator.check(value)))
        .collect();

    match format {
        "json" => {
            let reports: Vec<Report> = verdicts
                .iter()
                .map(|(value, verdict)| Report {
                    profile: profile.as_str(),
                    value: *value,
                    valid: verdict.is_valid(),
                    reason: verdict.reason(),
                    trace: trace.then(|| verdict.document.to_string()),
                })
                .collect();
            match serde_json::to_string_pretty(&reports) {
                Ok(json) => println!("{}", json),
                Err(e) => log::error!("Error formatting report: {}", e),
            }
        }
        _ => {
            for (value, verdict) in &verdicts {
                match verdict.reason() {
                    None => println!("{}: valid", value),
                    Some(reason) => println!("{}: invalid ({})", value, reason),
                }
                if trace {
                    println!("    {}", verdict.document);
                }
            }
        }
    }

    verdicts.iter().all(|(_, verdict)| verdict.is_valid())
}

/// Handle the list-profiles command
fn handle_list_profiles_command() {
    println!("Available profiles:\n");
    for profile in Profile::ALL {
        println!("  {}", profile);
        println!("    {}", profile.description());
        println!();
    }
}
