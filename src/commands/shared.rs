//! # Shared Command Utilities
//!
//! This module provides shared validation, parsing, and utility functions used by the
//! command handlers.

use handled::Handle;
use serde::de::DeserializeOwned;
use std::str::FromStr;

use crate::cli_utils;
use crate::commands::errors::UserError;
use crate::{CompanyId, MergeStrategy};

/// Parses a value, exiting with the error's user-facing message and hint on failure.
fn parse_or_exit<T, E>(input: &str, type_name: &str) -> T
where
    T: FromStr<Err = E>,
    E: Handle<UserError> + std::fmt::Display,
{
    input.parse().unwrap_or_else(|e: E| exit_with_handled(&e, type_name))
}

fn exit_with_handled<E>(error: &E, type_name: &str) -> !
where
    E: Handle<UserError> + std::fmt::Display,
{
    if let Some(user_error) = error.handle() {
        if let Some(ref hint) = user_error.usage_hint {
            cli_utils::exit_with_usage_error(&user_error.message, hint);
        } else {
            cli_utils::exit_with_error(&user_error.message);
        }
    } else {
        cli_utils::exit_with_error(&format!("Invalid {}: {}", type_name, error));
    }
}

/// Validates and parses a company ID from a string.
///
/// # Returns
/// The parsed CompanyId, or exits the program with an enhanced error message
pub fn parse_company_id_or_exit(id_str: &str) -> CompanyId {
    parse_or_exit(id_str, "company ID")
}

/// Validates and parses a merge strategy name from a string.
pub fn parse_strategy_or_exit(strategy_str: &str) -> MergeStrategy {
    parse_or_exit(strategy_str, "merge strategy")
}

/// Parses company data given on the command line as JSON or YAML.
///
/// YAML is a superset of JSON, so one parser accepts both.
pub fn parse_data_or_exit<T>(data: &str) -> T
where
    T: DeserializeOwned,
{
    serde_yml::from_str(data).unwrap_or_else(|e: serde_yml::Error| exit_with_handled(&e, "data"))
}

/// Validates both minimum and maximum argument counts.
///
/// # Arguments
/// * `args` - The command arguments array
/// * `min_count` - The minimum number of arguments required (including subcommand)
/// * `max_count` - The maximum number of arguments allowed (including subcommand)
/// * `command` - The command name for error message
/// * `usage` - The usage string to display
pub fn validate_args_count_or_exit(
    args: &[String],
    min_count: usize,
    max_count: usize,
    command: &str,
    usage: &str,
) {
    if args.len() < min_count {
        cli_utils::exit_with_usage_error(
            &format!("{} command requires more arguments", command),
            usage,
        );
    }
    if args.len() > max_count {
        cli_utils::exit_with_usage_error(
            &format!("{} command has too many arguments", command),
            usage,
        );
    }
}

/// Macro to generate command dispatcher boilerplate.
macro_rules! dispatch_command {
    ($command_name:expr, $usage:expr, $args:expr, $client:expr, $output_format:expr, {
        $($subcommand:expr => $handler:expr),* $(,)?
    }) => {
        if $args.is_empty() {
            crate::cli_utils::exit_with_usage_error(
                &format!("{} command requires a subcommand", $command_name),
                $usage,
            );
        }

        match $args[0].as_str() {
            $(
                $subcommand => $handler($args, $client, $output_format).await,
            )*
            _ => {
                let available_subcommands = vec![$($subcommand),*];
                crate::cli_utils::exit_with_error(&format!(
                    "Unknown {} subcommand '{}'. Available subcommands: {}",
                    $command_name,
                    $args[0],
                    available_subcommands.join(", ")
                ));
            }
        }
    };
}

pub(crate) use dispatch_command;
