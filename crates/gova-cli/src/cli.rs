//! Command-line surface of `gova-admin`

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// Build the `gova-admin` command
#[must_use]
pub fn command() -> Command {
    Command::new("gova-admin")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Gova Admin - browse and create graph database records")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("memory")
                .long("memory")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Use an empty in-process store instead of Neo4j"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print output as JSON"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(Command::new("resources").about("List registered resources and their fields"))
        .subcommand(
            Command::new("list")
                .about("Fetch and print records of a resource")
                .arg(
                    Arg::new("resource")
                        .required(true)
                        .help("Resource label, e.g. User"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .short('n')
                        .value_parser(value_parser!(usize))
                        .help("Maximum number of records (defaults to the configured fetch limit)"),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Fill the create form of a resource and save it")
                .arg(
                    Arg::new("resource")
                        .required(true)
                        .help("Resource label, e.g. User"),
                )
                .arg(
                    Arg::new("set")
                        .long("set")
                        .short('s')
                        .value_name("ATTR=VALUE")
                        .action(ArgAction::Append)
                        .value_parser(parse_assignment)
                        .help("Field value; repeat for each field"),
                ),
        )
}

/// Parse an `attribute=value` pair
///
/// The value may itself contain `=`; only the first one separates.
///
/// # Errors
/// When there is no `=` or the attribute is empty
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (attribute, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ATTR=VALUE, got `{raw}`"))?;
    let attribute = attribute.trim();
    if attribute.is_empty() {
        return Err(format!("missing attribute name in `{raw}`"));
    }
    Ok((attribute.to_string(), value.to_string()))
}
