//! # Company Command Handler
//!
//! This module handles company-related CLI commands: listing, fetching, creating,
//! patching, replacing and deleting companies.

use crate::{
    Company, CompanyPatch, CreateCompanyResponse, MergeStrategy, cli_utils,
    commands::shared::{
        dispatch_command, parse_company_id_or_exit, parse_data_or_exit, parse_strategy_or_exit,
        validate_args_count_or_exit,
    },
    http_utils,
};

const COMPANY_USAGE: &str =
    "Usage: companyctl company <list|get|create|patch|replace|delete> [args...]";

/// Handles all company-related commands.
///
/// # Arguments
/// * `args` - Command arguments (first element is the subcommand)
/// * `client` - HTTP client for API communication
/// * `output_format` - Output format for get/list commands
pub async fn handle_company_command(
    args: &[String],
    client: &http_utils::CompanyClient,
    output_format: cli_utils::OutputFormat,
) {
    dispatch_command!("company", COMPANY_USAGE, args, client, output_format, {
        "list" => handle_company_list,
        "get" => handle_company_get,
        "create" => handle_company_create,
        "patch" => handle_company_patch,
        "replace" => handle_company_replace,
        "delete" => handle_company_delete,
    });
}

/// Handles company listing command.
async fn handle_company_list(
    args: &[String],
    client: &http_utils::CompanyClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 1, 1, "list", "Usage: companyctl company list");
    let companies = http_utils::execute_or_exit(
        || client.get_optional::<Vec<Company>>("company"),
        "Failed to list companies",
    )
    .await;

    match companies {
        Some(companies) => cli_utils::print_formatted_or_exit(&companies, output_format, "companies"),
        None => println!("No companies found"),
    }
}

/// Handles company retrieval command.
async fn handle_company_get(
    args: &[String],
    client: &http_utils::CompanyClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 2, 2, "get", "Usage: companyctl company get <company-id>");
    let id = parse_company_id_or_exit(&args[1]);
    let path = format!("company/{}", id);

    let company = http_utils::execute_or_exit(
        || client.get::<Company>(&path),
        "Failed to get company",
    )
    .await;

    cli_utils::print_formatted_or_exit(&company, output_format, "company");
}

/// Handles company creation command.
async fn handle_company_create(
    args: &[String],
    client: &http_utils::CompanyClient,
    _output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 2, 2, "create", "Usage: companyctl company create <data>");
    let patch: CompanyPatch = parse_data_or_exit(&args[1]);

    let response = http_utils::execute_or_exit(
        || client.post::<CompanyPatch, CreateCompanyResponse>("company", &patch),
        "Failed to create company",
    )
    .await;

    println!("Created company: {}", response.id);
}

/// Handles partial company update command.
async fn handle_company_patch(
    args: &[String],
    client: &http_utils::CompanyClient,
    _output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        3,
        4,
        "patch",
        "Usage: companyctl company patch <company-id> <data> [field-walk|mapping]",
    );
    let id = parse_company_id_or_exit(&args[1]);
    let patch: CompanyPatch = parse_data_or_exit(&args[2]);
    let strategy = args
        .get(3)
        .map(|s| parse_strategy_or_exit(s))
        .unwrap_or_default();
    let path = patch_path(&id.to_string(), strategy);

    http_utils::execute_or_exit(|| client.patch(&path, &patch), "Failed to patch company").await;

    println!("Patched company {} ({})", id, strategy);
}

fn patch_path(id: &str, strategy: MergeStrategy) -> String {
    format!("company/{}?reflection={}", id, strategy.reflection())
}

/// Handles full company replacement command.
async fn handle_company_replace(
    args: &[String],
    client: &http_utils::CompanyClient,
    _output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        3,
        3,
        "replace",
        "Usage: companyctl company replace <company-id> <data>",
    );
    let id = parse_company_id_or_exit(&args[1]);
    let company: Company = parse_data_or_exit(&args[2]);
    let path = format!("company/{}", id);

    http_utils::execute_or_exit(|| client.put(&path, &company), "Failed to replace company")
        .await;

    println!("Replaced company: {}", id);
}

/// Handles company deletion command.
async fn handle_company_delete(
    args: &[String],
    client: &http_utils::CompanyClient,
    _output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        2,
        2,
        "delete",
        "Usage: companyctl company delete <company-id>",
    );
    let id = parse_company_id_or_exit(&args[1]);
    let path = format!("company/{}", id);

    http_utils::execute_or_exit(|| client.delete(&path), "Failed to delete company").await;

    println!("Deleted company: {}", id);
}
