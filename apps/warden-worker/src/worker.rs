use std::time::Duration as StdDuration;

use color_eyre::Result;
use uuid::Uuid;

use warden_config::ConfigCache;
use warden_domain::{Payload, Scope};
use warden_service::{PurgeRequest, SyncService};
use warden_storage::db::Db;

/// Dynamic config keys honored from the merged local cache; published values
/// arrive as JSON numbers or numeric strings.
const DAYS_TO_KEEP_KEY: &str = "history_days_to_keep";
const INTERVAL_KEY: &str = "maintenance_interval_sec";

pub struct WorkerState {
	pub service: SyncService<Db>,
	pub cache: ConfigCache,
	pub server_uid: Uuid,
	pub fallback_days_to_keep: i64,
	pub fallback_interval_secs: u64,
}

pub async fn run_worker(state: WorkerState) -> Result<()> {
	loop {
		if let Err(err) = reconcile_server_config(&state).await {
			tracing::error!(error = %err, "Config reconcile failed. Skipping this cycle.");
		}
		if let Err(err) = sweep_history(&state).await {
			tracing::error!(error = %err, "History sweep failed. Skipping this cycle.");
		}

		let interval = resolve_interval(&state);

		tracing::debug!(secs = interval.as_secs(), "Sleeping until the next maintenance cycle.");
		tokio::time::sleep(interval).await;
	}
}

/// Store-over-local: the published configuration overlays the local floor.
/// When the store is unreachable, or a published key has vanished, the floor
/// value reasserts itself on this cycle.
async fn reconcile_server_config(state: &WorkerState) -> Result<()> {
	let upstream = match state.service.current_server_config(state.server_uid).await {
		Ok(response) => response.config,
		Err(err) => {
			tracing::warn!(
				error = %err,
				"No published configuration reachable. Reverting to the local floor."
			);

			Payload::new()
		},
	};
	let merged = state.cache.reconcile(&upstream)?;

	tracing::debug!(keys = merged.len(), "Reconciled the local config cache.");

	Ok(())
}

async fn sweep_history(state: &WorkerState) -> Result<()> {
	let days_to_keep = resolve_days_to_keep(state);
	let purged = state
		.service
		.purge_older_than(PurgeRequest { scope: Scope::AgentData, uid: None, days_to_keep })
		.await?;

	tracing::info!(days_to_keep, deleted = purged.deleted, "History sweep finished.");

	Ok(())
}

fn resolve_days_to_keep(state: &WorkerState) -> i64 {
	match state.cache.get(DAYS_TO_KEEP_KEY).as_ref().and_then(config_int) {
		Some(days) if days >= 0 => days,
		Some(_) => {
			tracing::debug!("The configured retention horizon is negative. Using the fallback.");

			state.fallback_days_to_keep
		},
		None => state.fallback_days_to_keep,
	}
}

fn resolve_interval(state: &WorkerState) -> StdDuration {
	let secs = match state.cache.get(INTERVAL_KEY).as_ref().and_then(config_int) {
		Some(secs) if secs > 0 => secs as u64,
		Some(_) => {
			tracing::debug!("The configured loop interval is not positive. Using the fallback.");

			state.fallback_interval_secs
		},
		None => state.fallback_interval_secs,
	};

	StdDuration::from_secs(secs)
}

fn config_int(value: &serde_json::Value) -> Option<i64> {
	value.as_i64().or_else(|| value.as_str().and_then(|raw| raw.trim().parse().ok()))
}
