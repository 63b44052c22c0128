use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub identity: Identity,
	pub cache: Cache,
	#[serde(default)]
	pub maintenance: Maintenance,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Identity {
	pub uid_file: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Cache {
	/// Seeded out-of-band; never written by this process.
	pub floor_file: PathBuf,
	/// Rewritten atomically on every successful reconcile cycle.
	pub merged_file: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Maintenance {
	/// Static fallback; a published `history_days_to_keep` overrides it.
	pub days_to_keep: i64,
	/// Static fallback; a published `maintenance_interval_sec` overrides it.
	pub interval_secs: u64,
}
impl Default for Maintenance {
	fn default() -> Self {
		Self { days_to_keep: 14, interval_secs: 86_400 }
	}
}
