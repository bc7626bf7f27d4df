mod commands;
mod config;
mod render;

use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use platform_api::ApiClient;
use platform_authz::{AccessClassifier, PolicyEngine};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{HrModule, onboarding::TaskId};
use tracing::debug;

use crate::{
    commands::{CommandResult, Format, Session, describe_failure, reference_time},
    config::AppConfig,
};

#[derive(Parser, Debug)]
#[command(name = "hr-dashboard", version, about = "Role-gated HR dashboard")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Role key or label, e.g. `hr` or "HR Specialist".
    #[arg(short, long, global = true)]
    role: Option<String>,
    #[arg(long, global = true, value_name = "URL", help = "Dashboard API base url")]
    api_url: Option<String>,
    #[arg(long, global = true, help = "Print JSON instead of text")]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the selectable roles.
    Roles,
    /// Show the module grid for the selected role.
    Modules,
    /// Open a module by its exact name.
    Open { module: String },
    /// Contract expiry report.
    Contractors(AsOf),
    /// Contractors whose contract ends within the warning window.
    Expiring(AsOf),
    /// Onboarding checklists.
    Onboarding,
    /// Toggle one onboarding task and print the refreshed list.
    Toggle { staff_id: String, task_id: TaskId },
    /// Documents visible to the selected role.
    Resources,
    #[command(name = "time-off")]
    TimeOff,
    #[command(name = "time-tracking")]
    TimeTracking,
    Groups,
    Entities,
}

#[derive(Args, Debug)]
struct AsOf {
    #[arg(long, value_name = "YYYY-MM-DD", help = "Reference date instead of today")]
    as_of: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::load()?.with_overrides(cli.global.api_url, cli.global.role)?;
    init_tracing(ObsConfig {
        env_filter: config.log_filter.clone(),
        otlp_endpoint: config.otlp_endpoint.clone(),
        ..ObsConfig::default()
    })?;
    debug!(api_url = %config.api_url, role = ?config.role, "configuration loaded");

    let api = ApiClient::new(&config.api_url, config.timeout)?;
    let session = Session {
        hr: HrModule::new(api),
        policy: PolicyEngine::default(),
        classifier: AccessClassifier::default(),
        role: config.role,
        format: if cli.global.json {
            Format::Json
        } else {
            Format::Text
        },
    };

    match run(&session, cli.command).await {
        Ok(output) => {
            print!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprint!("{}", describe_failure(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(session: &Session, command: Command) -> CommandResult {
    match command {
        Command::Roles => session.roles(),
        Command::Modules => session.modules(),
        Command::Open { module } => session.open(&module).await,
        Command::Contractors(args) => session.contractors(reference_time(args.as_of), false).await,
        Command::Expiring(args) => session.contractors(reference_time(args.as_of), true).await,
        Command::Onboarding => session.onboarding().await,
        Command::Toggle { staff_id, task_id } => session.toggle(&staff_id, task_id).await,
        Command::Resources => session.resources().await,
        Command::TimeOff => session.time_off().await,
        Command::TimeTracking => session.time_tracking().await,
        Command::Groups => session.groups().await,
        Command::Entities => session.entities().await,
    }
}
