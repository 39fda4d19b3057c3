use std::process::ExitCode;
use std::sync::Arc;
use dotenv::dotenv;
use tracing::info;

mod cli;

use appointment_cell::{plan_from_config, prepare_seed, PreparedSeed, ReferenceTables, SeedingService};
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

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => err.report(),
    }
}

async fn run(args: cli::CliArgs) -> Result<(), AppError> {
    let config = AppConfig::from_env();
    let plan = plan_from_config(&config)?;
    info!("Seed plan: {} month(s), {} candidates", plan.months.len(), plan.total_candidates());

    if args.dry_run || config.dry_run {
        let prepared = prepare_seed(ReferenceTables::builtin(), &plan)?;
        return print_dry_run(&prepared);
    }

    let store = FirestoreClient::connect(&config, args.credential_path.as_deref())?;
    info!("Seeding {} in project {}", config.appointments_collection, store.project_id());

    let service = SeedingService::new(&config, Arc::new(store));
    let prepared = service.prepare(&plan)?;

    println!("Inserting {} appointments...", prepared.kept.len());

    let report = service
        .write(&prepared, |chunk| {
            println!("Batch {} done ({} docs)", chunk.index, chunk.documents);
        })
        .await?;

    info!(
        "Generated {}, inserted {}, skipped {} in {} batch(es)",
        report.generated, report.kept, report.skipped, report.chunks
    );
    println!("Seeding complete.");

    Ok(())
}

fn print_dry_run(prepared: &PreparedSeed) -> Result<(), AppError> {
    println!(
        "Dry run: {} generated, {} would be inserted, {} skipped as duplicates",
        prepared.generated,
        prepared.kept.len(),
        prepared.skipped
    );

    for candidate in &prepared.kept {
        println!("{}", serde_json::to_string(&candidate.to_json()?)?);
    }

    Ok(())
}
