use std::process::ExitCode;
use std::sync::Arc;
use dotenv::dotenv;
use tracing::info;

mod cli;

use directory_cell::{render_directory, DirectoryService};
use shared_config::AppConfig;
use shared_database::FirestoreClient;
use shared_models::AppError;
use shared_utils::telemetry::init_tracing;

#[tokio::main]
async fn main() -> ExitCode {
    // Loading Env Vars
    dotenv().ok();

    init_tracing("info");

    let args = match cli::CliArgs::parse_or_exit() {
        Ok(args) => args,
        Err(code) => return code,
    };

    match run(args.credential_path.as_deref()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => err.report(),
    }
}

async fn run(credential_arg: Option<&str>) -> Result<(), AppError> {
    let config = AppConfig::from_env();

    let store = FirestoreClient::connect(&config, credential_arg)?;
    info!("Listing doctors and patients for project {}", store.project_id());

    let service = DirectoryService::new(&config, Arc::new(store));
    let directory = service.read().await?;

    print!("{}", render_directory(&directory));
    Ok(())
}
