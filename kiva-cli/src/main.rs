//! `kiva`: command-line access to the Kiva microfinance web API.
//!
//! Every subcommand maps to one client accessor and prints the hydrated records to stdout
//! as pretty JSON. `--fixtures` replays a recorded fixture file instead of going online;
//! `--record` saves the live exchanges to one.

#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and clap"
)]

mod cli;
mod observability;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use kiva_client::{
    ClientConfig, KivaClient,
    transport::{FixtureTransport, HttpTransport, RecordingTransport, Transport},
};
use observability::{LogFormat, init_observability};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_observability(LogFormat::from_env());

    let args = Cli::parse();
    let config = load_config(&args)?;

    let output = if let Some(path) = &args.fixtures {
        let fixtures = FixtureTransport::from_file(path)
            .with_context(|| format!("loading fixtures from {}", path.display()))?;
        let client = KivaClient::with_config(fixtures, &config)?;
        run(&client, &args.command).await?
    } else if let Some(path) = &args.record {
        let transport = RecordingTransport::new(HttpTransport::with_config(&config.http)?);
        let client = KivaClient::with_config(transport, &config)?;
        let output = run(&client, &args.command).await?;
        client.transport().save(path).await?;
        info!(path = %path.display(), "saved recorded fixtures");
        output
    } else {
        let client = KivaClient::from_config(&config)?;
        run(&client, &args.command).await?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_config(args: &Cli) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ClientConfig::default(),
    };

    if let Some(base_url) = &args.base_url {
        config.base_url.clone_from(base_url);
    }

    config.validate()?;
    Ok(config)
}

async fn run<T: Transport>(client: &KivaClient<T>, command: &Commands) -> Result<Value> {
    let output = match command {
        Commands::Loans { ids } => to_json(&client.loans(ids).await?)?,
        Commands::Newest { page } => to_json(&client.newest_loans(*page).await?)?,
        Commands::Search { page, .. } => {
            let filter = command.loan_filter().unwrap_or_default();
            to_json(&client.search_loans(&filter, *page).await?)?
        }
        Commands::LenderLoans { uids, sort, page } => {
            to_json(&client.loans_for_lenders(uids, *sort, *page).await?)?
        }
        Commands::Lenders { uids } => to_json(&client.lenders(uids).await?)?,
        Commands::LoanLenders { loan_id, page } => {
            to_json(&client.lenders_for_loan(*loan_id, *page).await?)?
        }
        Commands::LendingActions => to_json(&client.recent_lending_actions().await?)?,
        Commands::Journal { loan_id, page, include_bulk, with_comments } => {
            let mut entries = client.journal_entries(*loan_id, *page, *include_bulk).await?;
            if *with_comments {
                for entry in &mut entries {
                    client.load_comments(entry).await?;
                }
            }
            to_json(&entries)?
        }
        Commands::SearchJournal { page, .. } => {
            let filter = command.journal_filter().unwrap_or_default();
            to_json(&client.search_journal_entries(&filter, *page).await?)?
        }
        Commands::Comments { entry_id } => to_json(&client.comments(*entry_id).await?)?,
        Commands::Partners { page } => to_json(&client.partners(*page).await?)?,
        Commands::Release => to_json(&client.current_release().await?)?,
        Commands::Templates => to_json(&client.image_templates().await?)?,
    };
    Ok(output)
}

fn to_json<S: Serialize>(records: &S) -> Result<Value> {
    Ok(serde_json::to_value(records)?)
}
