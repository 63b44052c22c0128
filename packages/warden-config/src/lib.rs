pub mod cache;
pub mod identity;

mod error;
mod types;

pub use cache::ConfigCache;
pub use error::{Error, Result};
pub use types::{Cache, Config, Identity, Maintenance, Postgres, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.identity.uid_file.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "identity.uid_file must be non-empty.".to_string(),
		});
	}
	if cfg.cache.floor_file.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "cache.floor_file must be non-empty.".to_string(),
		});
	}
	if cfg.cache.merged_file.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "cache.merged_file must be non-empty.".to_string(),
		});
	}
	if cfg.cache.merged_file == cfg.cache.floor_file {
		return Err(Error::Validation {
			message: "cache.merged_file must differ from cache.floor_file.".to_string(),
		});
	}
	if cfg.maintenance.days_to_keep < 0 {
		return Err(Error::Validation {
			message: "maintenance.days_to_keep must be zero or greater.".to_string(),
		});
	}
	if cfg.maintenance.interval_secs == 0 {
		return Err(Error::Validation {
			message: "maintenance.interval_secs must be greater than zero.".to_string(),
		});
	}

	Ok(())
}
