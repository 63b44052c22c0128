pub mod worker;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = warden_config::load(&args.config)?;
	let filter = EnvFilter::try_new(&config.service.log_level)
		.unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	// An unreachable store at startup is fatal; mid-cycle failures are not.
	let db = warden_storage::db::Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let server_uid = warden_config::identity::load_or_create_uid(&config.identity.uid_file);

	if server_uid.is_nil() {
		return Err(color_eyre::eyre::eyre!("Could not establish a server UID."));
	}

	tracing::info!(%server_uid, "Maintenance worker starting.");

	let state = worker::WorkerState {
		service: warden_service::SyncService::new(db),
		cache: warden_config::ConfigCache::new(
			config.cache.floor_file.clone(),
			config.cache.merged_file.clone(),
		),
		server_uid,
		fallback_days_to_keep: config.maintenance.days_to_keep,
		fallback_interval_secs: config.maintenance.interval_secs,
	};

	worker::run_worker(state).await
}
