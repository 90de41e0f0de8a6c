use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use testplan_extractor::client::{AzureDevOpsClient, Credential, CredentialError};
use testplan_extractor::export::{self, ExportConfig, SuiteExporter};
use testplan_extractor::model::SuiteId;
use testplan_extractor::runner::{self, describe_suites, RunOptions, SuiteSelection};
use testplan_extractor::utils::Config;

#[derive(Parser)]
#[command(name = "testplan-extractor")]
#[command(version)]
#[command(about = "Extract test cases from Azure DevOps Test Plans", long_about = None)]
#[command(after_help = "Examples:
  testplan-extractor                                   Extract the default suite range
  testplan-extractor --suites 1410044                  Extract only suite 1410044
  testplan-extractor --suites 1410044 1410045 1410050  Extract specific suites
  testplan-extractor --range 1410044 1410048           Extract suites 1410044 to 1410048")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    extract: ExtractArgs,

    /// Azure DevOps organization
    #[arg(long, global = true)]
    organization: Option<String>,

    /// Project holding the test plan
    #[arg(long, global = true)]
    project: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the personal access token can reach the project
    CheckToken,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Specific suite IDs to extract (e.g. --suites 1410044 1410045)
    #[arg(long, num_args = 1.., value_name = "ID", conflicts_with = "range")]
    suites: Option<Vec<SuiteId>>,

    /// Range of suite IDs to extract, both ends included
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    range: Option<Vec<SuiteId>>,

    /// Test plan the suites belong to
    #[arg(long)]
    plan_id: Option<u64>,

    /// Directory for JSON output files
    #[arg(long)]
    json_dir: Option<PathBuf>,

    /// Directory for Excel output files
    #[arg(long)]
    excel_dir: Option<PathBuf>,

    /// Skip Excel output
    #[arg(long, default_value = "false")]
    no_excel: bool,
}

impl ExtractArgs {
    fn selection(&self) -> SuiteSelection {
        if let Some(ids) = &self.suites {
            return SuiteSelection::Explicit(ids.clone());
        }
        match self.range.as_deref() {
            Some(&[start, end]) => SuiteSelection::Range { start, end },
            _ => SuiteSelection::Default,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = build_config(&cli);

    match cli.command {
        Some(Commands::CheckToken) => check_token(&config).await,
        None => extract(&config, &cli.extract).await,
    }
}

fn build_config(cli: &Cli) -> Config {
    let mut config = Config::default();
    if let Some(org) = &cli.organization {
        config.organization = org.clone();
    }
    if let Some(project) = &cli.project {
        config.project = project.clone();
    }
    if let Some(plan_id) = cli.extract.plan_id {
        config.plan_id = plan_id;
    }
    if let Some(dir) = &cli.extract.json_dir {
        config.json_dir = dir.clone();
    }
    if let Some(dir) = &cli.extract.excel_dir {
        config.excel_dir = dir.clone();
    }
    config
}

async fn extract(config: &Config, args: &ExtractArgs) -> Result<()> {
    println!("{}", "Azure DevOps Test Case Extraction".bold());
    println!("{}", "=".repeat(50));

    if !export::spreadsheet_supported() {
        println!(
            "{} Warning: built without Excel support. Only JSON files will be written.",
            "⚠️ ".yellow()
        );
    }

    let credential = load_credential(config)?;
    println!(
        "{} PAT token found (length: {})",
        "✅".green(),
        credential.len()
    );

    let suite_ids = args.selection().resolve(&config.default_suites);
    if suite_ids.is_empty() {
        println!(
            "{} No valid suite IDs to process - check your input parameters",
            "⚠️ ".yellow()
        );
        return Ok(());
    }

    let client = AzureDevOpsClient::new(config, &credential)?;
    let exporter = SuiteExporter::new(ExportConfig::from_config(config, !args.no_excel));

    println!("Extracting test cases for {}", describe_suites(&suite_ids).cyan());
    println!("  Plan: {}", config.plan_id.to_string().cyan());
    println!("  JSON output: {}", config.json_dir.display().to_string().cyan());
    if exporter.spreadsheets_enabled() {
        println!("  Excel output: {}", config.excel_dir.display().to_string().cyan());
    } else {
        println!("  Excel output: {}", "Disabled".yellow());
    }
    println!("{}", "-".repeat(50));

    let summary =
        runner::run_extraction(&client, &exporter, &RunOptions::from(config), &suite_ids).await;
    runner::print_summary(&summary, &exporter);

    Ok(())
}

async fn check_token(config: &Config) -> Result<()> {
    println!("{}", "Azure DevOps PAT Check".bold());
    println!("{}", "=".repeat(40));

    let credential = match load_credential(config) {
        Ok(credential) => credential,
        Err(e) => {
            print_token_guide(config);
            return Err(e);
        }
    };
    println!(
        "{} PAT token configured (length: {})",
        "✅".green(),
        credential.len()
    );

    let client = AzureDevOpsClient::new(config, &credential)?;
    match client.project_info().await {
        Ok(project) => {
            println!("{} PAT token works!", "✅".green());
            println!(
                "   Connected to project: {}",
                project.name.as_deref().unwrap_or("Unknown").cyan()
            );
            Ok(())
        }
        Err(e) => {
            println!("{} PAT token test failed: {}", "❌".red(), e);
            Err(e.into())
        }
    }
}

fn load_credential(config: &Config) -> Result<Credential> {
    match Credential::from_env(&config.credential_var) {
        Ok(credential) => Ok(credential),
        Err(e @ CredentialError::Missing { .. }) => {
            println!("{} ERROR: {}", "❌".red(), e);
            println!("\nTo fix this:");
            println!("1. Create a Personal Access Token in Azure DevOps");
            println!(
                "2. Set environment variable: {}=your_token_here",
                config.credential_var
            );
            println!("3. Run this command again");
            Err(e.into())
        }
    }
}

fn print_token_guide(config: &Config) {
    println!("\n{}", "How to create an Azure DevOps Personal Access Token".bold());
    println!(
        "1. Open {}/{} in your browser",
        config.base_url, config.organization
    );
    println!("2. Profile picture (top right) > Personal access tokens");
    println!("3. Click '+ New Token'");
    println!("4. Scopes: 'Custom defined', check 'Test Plans (read)'");
    println!("5. Create and copy the token, it is shown only once");
}
