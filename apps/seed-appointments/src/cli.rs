use std::process::ExitCode;
use clap::Parser;

#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "seed-appointments", version, about = "Generates and inserts deterministic appointments", long_about = None)]
pub struct CliArgs {
    /// Service account JSON; falls back to GOOGLE_APPLICATION_CREDENTIALS, then ./serviceAccountKey.json
    #[arg(value_name = "CREDENTIAL_PATH")]
    pub credential_path: Option<String>,

    /// Generate and deduplicate only, without touching Firestore (also SEED_DRY_RUN)
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Help and version exit 0; usage errors exit 1 like every other failure.
    pub fn parse_or_exit() -> Result<Self, ExitCode> {
        Self::try_parse().map_err(|err| {
            let _ = err.print();
            if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        })
    }
}
