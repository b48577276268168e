use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use companies::{
    cli_utils::{self, OutputFormat},
    commands::handle_company_command,
    http_utils,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the companies API server")]
    base_url: String,
    #[arrrg(
        optional,
        "Output format for get/list commands: json or yaml (default: json)"
    )]
    output: OutputFormat,
}

const USAGE: &str = r#"Usage: companyctl [options] <command> [args...]

Options:
  --base-url <url>     Base URL of the companies API server (default: http://localhost:8080)
  --output <format>    Output format for get/list commands: json or yaml (default: json)

Commands:
  company list                                       List all companies
  company get <company-id>                           Get a company by ID
  company create <data>                              Create a company from JSON or YAML
  company patch <company-id> <data> [strategy]       Merge a partial update
                                                     (strategy: field-walk or mapping)
  company replace <company-id> <data>                Replace every field of a company
  company delete <company-id>                        Delete a company"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, free) =
        Options::from_command_line_relaxed("USAGE: companyctl <command> [args...]");

    if free.is_empty() {
        cli_utils::exit_with_usage_error("No command specified", USAGE);
    }

    let base_url = if options.base_url.is_empty() {
        "http://localhost:8080".to_string()
    } else {
        options.base_url
    };

    let client = http_utils::CompanyClient::new(base_url);

    match free[0].as_str() {
        "company" => {
            handle_company_command(&free[1..], &client, options.output).await;
        }
        _ => {
            cli_utils::exit_with_error(&format!(
                "Unknown command '{}'. Available commands: company",
                free[0]
            ));
        }
    }

    Ok(())
}
