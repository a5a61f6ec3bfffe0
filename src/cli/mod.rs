use crate::core::{
    backend::SubmitRequest,
    client::AuctionClient,
    config::{Config, ConfigService},
    controller::SubmissionController,
    guard::SubmissionLockStore,
    models::{DataPath, validate_auction_id},
    poller::{PollConfig, PollOutcome, poll_until_terminal},
    progress::{PollEvent, poll_event_channel},
};
use crate::tui::{ConsoleStatusView, TaskWatcher};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use futures::future::join_all;
use log::info;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "auctionr")]
#[command(about = "A CLI client for auction operations.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets a custom data path
    #[arg(long, value_name = "FILE")]
    pub data_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Void unpaid invoices for one or more auctions
    VoidUnpaid {
        /// Auction/event id to process (repeat for a batch)
        #[arg(long = "auction-id", value_name = "ID", required = true)]
        auction_ids: Vec<String>,
        /// Warehouse the auctions belong to (falls back to default_warehouse)
        #[arg(long)]
        warehouse: Option<String>,
        /// Upload handling passed through to the void process
        #[arg(long, default_value_t = 1)]
        upload_choice: u32,
        /// Run the backend browser visibly
        #[arg(long)]
        show_browser: bool,
    },
    /// Create a new auction
    CreateAuction {
        /// Title of the new auction
        #[arg(long)]
        title: String,
        /// Ending date, YYYY-MM-DD
        #[arg(long)]
        ending_date: String,
        #[arg(long)]
        warehouse: Option<String>,
        #[arg(long)]
        show_browser: bool,
    },
    /// Remove duplicate lots from an auction
    RemoveDuplicates {
        #[arg(long)]
        auction_id: String,
        /// Target MSRP used when merging duplicates
        #[arg(long)]
        target_msrp: f64,
        #[arg(long)]
        warehouse: Option<String>,
    },
    /// Format an auction for publication
    FormatAuction {
        #[arg(long)]
        auction_id: String,
        #[arg(long)]
        warehouse: Option<String>,
    },
    /// Upload an auction to HiBid
    UploadToHibid {
        #[arg(long)]
        auction_id: String,
        #[arg(long)]
        title: String,
        /// Ending date, YYYY-MM-DD
        #[arg(long)]
        ending_date: String,
        #[arg(long)]
        warehouse: Option<String>,
        #[arg(long)]
        show_browser: bool,
    },
    /// Watch a running task's progress in a live view
    Watch {
        /// Task id returned by a submit operation
        task_id: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// The key to get
        key: String,
    },
    /// Set a configuration value
    Set {
        /// The key to set
        key: String,
        /// The value to set
        value: String,
    },
}

fn load_service_config(data_path: &DataPath) -> io::Result<Config> {
    let config = ConfigService::load_config(data_path)?;
    if config.base_url.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "No base_url configured. Run 'auctionr config set base_url <url>' first.",
        ));
    }
    Ok(config)
}

fn resolve_warehouse(config: &Config, warehouse: &Option<String>) -> io::Result<String> {
    match warehouse.clone().or_else(|| config.default_warehouse.clone()) {
        Some(warehouse) if !warehouse.trim().is_empty() => Ok(warehouse),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "No warehouse given and no default_warehouse configured.",
        )),
    }
}

fn build_controller(config: &Config) -> io::Result<SubmissionController<AuctionClient>> {
    let client = AuctionClient::new(config)?;
    Ok(SubmissionController::new(
        SubmissionLockStore::new(),
        client,
        PollConfig::from_millis(config.poll_interval_ms()),
    ))
}

/// Runs every submission concurrently over one shared lock store. Duplicate
/// target keys in the batch are rejected by the guard, the rest proceed.
async fn run_submissions(
    controller: SubmissionController<AuctionClient>,
    submissions: Vec<(String, SubmitRequest)>,
) -> io::Result<()> {
    let controller = Arc::new(controller);
    let label_targets = submissions.len() > 1;

    let tasks: Vec<_> = submissions
        .into_iter()
        .map(|(key, request)| {
            let controller = Arc::clone(&controller);
            let mut view = if label_targets {
                ConsoleStatusView::for_target(&key)
            } else {
                ConsoleStatusView::new()
            };
            tokio::spawn(async move {
                let outcome = controller.submit(&key, request, &mut view).await;
                (key, outcome)
            })
        })
        .collect();

    let mut incomplete = 0usize;
    for joined in join_all(tasks).await {
        let (key, outcome) =
            joined.map_err(|e| io::Error::other(format!("Submission task panicked: {e}")))?;
        if outcome.is_success() {
            info!("submission for '{key}' completed");
        } else {
            incomplete += 1;
        }
    }

    if incomplete > 0 {
        return Err(io::Error::other(format!(
            "{incomplete} submission(s) did not complete"
        )));
    }
    Ok(())
}

pub async fn handle_void_unpaid(
    data_path: &DataPath,
    auction_ids: &[String],
    warehouse: &Option<String>,
    upload_choice: u32,
    show_browser: bool,
) -> io::Result<()> {
    for id in auction_ids {
        validate_auction_id(id)?;
    }
    let config = load_service_config(data_path)?;
    let warehouse = resolve_warehouse(&config, warehouse)?;

    let submissions = auction_ids
        .iter()
        .map(|id| {
            let mut request = SubmitRequest::new("/auction/void-unpaid/")
                .field("warehouse", warehouse.clone())
                .field("auction_id", id.clone())
                .field("upload_choice", upload_choice.to_string());
            if show_browser {
                request = request.field("show_browser", "on");
            }
            (id.clone(), request)
        })
        .collect();

    run_submissions(build_controller(&config)?, submissions).await
}

pub async fn handle_create_auction(
    data_path: &DataPath,
    title: &str,
    ending_date: &str,
    warehouse: &Option<String>,
    show_browser: bool,
) -> io::Result<()> {
    if title.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Auction title cannot be empty",
        ));
    }
    validate_ending_date(ending_date)?;
    let config = load_service_config(data_path)?;
    let warehouse = resolve_warehouse(&config, warehouse)?;

    let mut request = SubmitRequest::new("/auction/create-auction/")
        .field("auction_title", title)
        .field("ending_date", ending_date)
        .field("selected_warehouse", warehouse);
    if show_browser {
        request = request.field("show_browser", "on");
    }

    // The auction has no id yet; the title is the target identity.
    run_submissions(
        build_controller(&config)?,
        vec![(title.to_string(), request)],
    )
    .await
}

pub async fn handle_remove_duplicates(
    data_path: &DataPath,
    auction_id: &str,
    target_msrp: f64,
    warehouse: &Option<String>,
) -> io::Result<()> {
    validate_auction_id(auction_id)?;
    if !target_msrp.is_finite() || target_msrp <= 0.0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Target MSRP must be a positive number",
        ));
    }
    let config = load_service_config(data_path)?;
    let warehouse = resolve_warehouse(&config, warehouse)?;

    let request = SubmitRequest::new("/auction/remove-duplicates/")
        .field("auction_number", auction_id)
        .field("target_msrp", target_msrp.to_string())
        .field("warehouse_name", warehouse);

    run_submissions(
        build_controller(&config)?,
        vec![(auction_id.to_string(), request)],
    )
    .await
}

pub async fn handle_format_auction(
    data_path: &DataPath,
    auction_id: &str,
    warehouse: &Option<String>,
) -> io::Result<()> {
    validate_auction_id(auction_id)?;
    let config = load_service_config(data_path)?;
    let warehouse = resolve_warehouse(&config, warehouse)?;

    let request = SubmitRequest::new("/auction/format-auction/")
        .field("auction_id", auction_id)
        .field("selected_warehouse", warehouse);

    run_submissions(
        build_controller(&config)?,
        vec![(auction_id.to_string(), request)],
    )
    .await
}

pub async fn handle_upload_to_hibid(
    data_path: &DataPath,
    auction_id: &str,
    title: &str,
    ending_date: &str,
    warehouse: &Option<String>,
    show_browser: bool,
) -> io::Result<()> {
    validate_auction_id(auction_id)?;
    validate_ending_date(ending_date)?;
    let config = load_service_config(data_path)?;
    let warehouse = resolve_warehouse(&config, warehouse)?;

    let mut request = SubmitRequest::new("/auction/upload-to-hibid/")
        .field("auction_id", auction_id)
        .field("ending_date", ending_date)
        .field("auction_title", title)
        .field("selected_warehouse", warehouse);
    if show_browser {
        request = request.field("show_browser", "on");
    }

    run_submissions(
        build_controller(&config)?,
        vec![(auction_id.to_string(), request)],
    )
    .await
}

pub async fn handle_watch(data_path: &DataPath, task_id: &str) -> io::Result<()> {
    if task_id.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Task id cannot be empty",
        ));
    }
    let config = load_service_config(data_path)?;
    let client = AuctionClient::new(&config)?;
    let poll = PollConfig::from_millis(config.poll_interval_ms());

    let (sender, receiver) = poll_event_channel();
    let owned_task_id = task_id.to_string();
    tokio::spawn(async move {
        let outcome = poll_until_terminal(&client, &owned_task_id, &poll, |status| {
            // The watcher drains far faster than the poll tick fills.
            let _ = sender.try_send(PollEvent::Tick(status.clone()));
        })
        .await;
        let _ = sender.send(PollEvent::Finished(outcome)).await;
    });

    let mut watcher = TaskWatcher::new(task_id.to_string(), receiver);
    match watcher.run()? {
        Some(PollOutcome::Completed) => {
            println!("Task {task_id} completed.");
            Ok(())
        }
        Some(PollOutcome::ServerError) => {
            println!("Task {task_id} ended in ERROR.");
            Err(io::Error::other("task failed"))
        }
        Some(PollOutcome::TransportFailed) => {
            println!("Failed to check status of task {task_id}.");
            Err(io::Error::other("status check failed"))
        }
        None => {
            println!("Stopped watching task {task_id}; it may still be running.");
            Ok(())
        }
    }
}

pub fn handle_config_command(
    data_path: &DataPath,
    command: &Option<ConfigCommands>,
) -> io::Result<()> {
    match command {
        Some(ConfigCommands::Get { key }) => {
            let config = ConfigService::load_config(data_path)?;
            println!("{key}: {}", ConfigService::get_value(&config, key)?);
            println!("Config file: {}", data_path.config_path().display());
        }
        Some(ConfigCommands::Set { key, value }) => {
            let mut config = ConfigService::load_config(data_path)?;
            ConfigService::set_value(&mut config, key, value)?;
            ConfigService::save_config(&config, data_path)?;
            info!("Updated {key} configuration");
            println!("{key} set to: {}", ConfigService::get_value(&config, key)?);
            println!("Config file: {}", data_path.config_path().display());
        }
        None => {
            let config = ConfigService::load_config(data_path)?;
            println!("Current Configuration:");
            println!("======================");
            println!("base_url: {}", config.base_url);
            println!("csrf_token: {}", config.csrf_token);
            println!(
                "default_warehouse: {}",
                config.default_warehouse.as_deref().unwrap_or("")
            );
            println!("poll_interval_ms: {}", config.poll_interval_ms());
            println!();
            println!("Config file: {}", data_path.config_path().display());
        }
    }
    Ok(())
}

fn validate_ending_date(ending_date: &str) -> io::Result<()> {
    NaiveDate::parse_from_str(ending_date, "%Y-%m-%d").map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid ending date (expected YYYY-MM-DD): {e}"),
        )
    })?;
    Ok(())
}
