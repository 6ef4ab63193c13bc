mod registry;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use libseed_core::{ConnectionSettings, Error as SeedError, SeedConfig};
use libseed_load::{PostgresStore, SeedPipeline, SeedReport};
use registry::{RunContext, init_run_logging, start_run, write_report};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("seed error: {0}")]
    Seed(#[from] SeedError),
}

#[derive(Parser)]
#[command(name = "libseed", version, about = "Synthetic library data seeder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Populate the library tables with synthetic rows.
    Seed(SeedArgs),
}

#[derive(Args)]
struct SeedArgs {
    #[command(flatten)]
    connection: ConnectionArgs,
    /// Row targets to load.
    #[arg(long, value_enum, default_value_t = Profile::Full)]
    profile: Profile,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
}

#[derive(Args)]
struct ConnectionArgs {
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    host: String,
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    port: u16,
    #[arg(long, env = "DB_USER")]
    user: String,
    #[arg(long, env = "DB_PASS", hide_env_values = true)]
    password: String,
    #[arg(long, env = "DB_NAME")]
    database: String,
}

impl From<ConnectionArgs> for ConnectionSettings {
    fn from(args: ConnectionArgs) -> Self {
        ConnectionSettings {
            host: args.host,
            port: args.port,
            user: args.user,
            password: args.password,
            database: args.database,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Profile {
    /// Production-scale targets.
    Full,
    /// A few dozen rows per table.
    Smoke,
}

impl Profile {
    fn as_str(self) -> &'static str {
        match self {
            Profile::Full => "full",
            Profile::Smoke => "smoke",
        }
    }

    fn config(self) -> SeedConfig {
        match self {
            Profile::Full => SeedConfig::default(),
            Profile::Smoke => SeedConfig::smoke(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Seed(args) => run_seed(args).await,
    }
}

async fn run_seed(args: SeedArgs) -> Result<(), CliError> {
    let SeedArgs {
        connection,
        profile,
        run_dir,
    } = args;

    let config = profile.config();
    config.validate()?;
    let settings = ConnectionSettings::from(connection);

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        engine: "postgres".to_string(),
        profile: profile.as_str().to_string(),
        run_dir,
        config: config.clone(),
        connection: settings.redacted(),
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    info!(
        event = "run_started",
        run_id = %run_id,
        profile = profile.as_str(),
        connection = %run_ctx.connection.redacted,
        run_dir = %run_paths.root.display(),
    );

    let timer = Instant::now();
    let report = match seed(&settings, config).await {
        Ok(report) => report,
        Err(err) => {
            error!(event = "run_finished", status = "failed", error = %err);
            return Err(err.into());
        }
    };

    write_report(&run_paths, &report)?;
    info!(event = "report_written", path = %run_paths.report_path.display());

    let duration_ms = timer.elapsed().as_millis();
    info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    Ok(())
}

/// Acquire the store, hand it to the pipeline, and let the pipeline release it.
async fn seed(settings: &ConnectionSettings, config: SeedConfig) -> Result<SeedReport, SeedError> {
    let store = PostgresStore::connect(settings).await?;
    match store.database_name().await {
        Ok(database) => info!(event = "store_connected", database = %database),
        Err(err) => warn!(event = "store_connected", error = %err, "could not read database name"),
    }

    let mut pipeline = SeedPipeline::new(store, config).await?;
    pipeline.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> SeedArgs {
        let mut argv = vec![
            "libseed", "seed", "--host", "db", "--port", "6543", "--user", "seeder", "--password",
            "pw", "--database", "library",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Seed(args) => args,
        }
    }

    #[test]
    fn defaults_to_full_profile() {
        let args = parse(&[]);
        assert_eq!(args.profile, Profile::Full);
        assert_eq!(args.run_dir, PathBuf::from("runs"));
        assert_eq!(args.profile.config().targets.transactions, 5_000_000);
    }

    #[test]
    fn smoke_profile_and_connection_flags() {
        let args = parse(&["--profile", "smoke", "--run-dir", "/tmp/seed-runs"]);
        assert_eq!(args.profile.config().targets.authors, 5);
        assert_eq!(args.run_dir, PathBuf::from("/tmp/seed-runs"));

        let settings = ConnectionSettings::from(args.connection);
        assert_eq!(settings.port, 6543);
        assert_eq!(settings.redacted().redacted, "postgres://seeder:***@db:6543/library");
    }

    #[test]
    fn rejects_unknown_profile() {
        let argv = [
            "libseed", "seed", "--user", "u", "--password", "p", "--database", "d", "--profile",
            "huge",
        ];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
