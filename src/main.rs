mod cli;
mod core;
mod tui;

use crate::cli::{Cli, Commands};
use crate::core::models::DataPath;
use clap::Parser;
use std::fs;
use std::io;

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let data_path = DataPath::new(cli.data_path.clone())?;
    fs::create_dir_all(&data_path.root)?;

    match &cli.command {
        Commands::VoidUnpaid {
            auction_ids,
            warehouse,
            upload_choice,
            show_browser,
        } => {
            cli::handle_void_unpaid(
                &data_path,
                auction_ids,
                warehouse,
                *upload_choice,
                *show_browser,
            )
            .await
        }
        Commands::CreateAuction {
            title,
            ending_date,
            warehouse,
            show_browser,
        } => {
            cli::handle_create_auction(&data_path, title, ending_date, warehouse, *show_browser)
                .await
        }
        Commands::RemoveDuplicates {
            auction_id,
            target_msrp,
            warehouse,
        } => cli::handle_remove_duplicates(&data_path, auction_id, *target_msrp, warehouse).await,
        Commands::FormatAuction {
            auction_id,
            warehouse,
        } => cli::handle_format_auction(&data_path, auction_id, warehouse).await,
        Commands::UploadToHibid {
            auction_id,
            title,
            ending_date,
            warehouse,
            show_browser,
        } => {
            cli::handle_upload_to_hibid(
                &data_path,
                auction_id,
                title,
                ending_date,
                warehouse,
                *show_browser,
            )
            .await
        }
        Commands::Watch { task_id } => cli::handle_watch(&data_path, task_id).await,
        Commands::Config { command } => cli::handle_config_command(&data_path, command),
    }
}
