use std::{
	fs,
	path::{Path, PathBuf},
};

use warden_domain::{Payload, merge};

use crate::{Error, Result};

/// Durable local mirror of the last-known configuration.
///
/// Two JSON key-value files: an immutable floor (seeded out-of-band) and a
/// merged view recomputed on every reconcile cycle as `overlay(floor,
/// upstream)`. A key that disappears upstream reverts to its floor value on
/// the next cycle; the merge never deletes a floor key. Missing files read
/// as empty, not as errors.
pub struct ConfigCache {
	floor_file: PathBuf,
	merged_file: PathBuf,
}
impl ConfigCache {
	pub fn new(floor_file: PathBuf, merged_file: PathBuf) -> Self {
		Self { floor_file, merged_file }
	}

	pub fn floor(&self) -> Payload {
		read_payload(&self.floor_file)
	}

	/// The current merged view, falling back to the floor before the first
	/// reconcile has run.
	pub fn merged(&self) -> Payload {
		let merged = read_payload(&self.merged_file);

		if merged.is_empty() { self.floor() } else { merged }
	}

	pub fn get(&self, key: &str) -> Option<serde_json::Value> {
		self.merged().get(key).cloned()
	}

	/// Overlays the upstream configuration onto the floor and rewrites the
	/// merged file atomically (write-temp-then-rename).
	pub fn reconcile(&self, upstream: &Payload) -> Result<Payload> {
		let merged = merge::overlay(&self.floor(), upstream);

		write_payload_atomically(&self.merged_file, &merged)?;

		Ok(merged)
	}
}

fn read_payload(path: &Path) -> Payload {
	let raw = match fs::read_to_string(path) {
		Ok(raw) => raw,
		Err(err) => {
			tracing::debug!(?path, error = %err, "Config cache file is not readable. Treating as empty.");

			return Payload::new();
		},
	};

	match serde_json::from_str::<Payload>(&raw) {
		Ok(payload) => payload,
		Err(err) => {
			tracing::warn!(?path, error = %err, "Config cache file is corrupt. Treating as empty.");

			Payload::new()
		},
	}
}

fn write_payload_atomically(path: &Path, payload: &Payload) -> Result<()> {
	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		fs::create_dir_all(parent)
			.map_err(|err| Error::WriteCache { path: path.to_path_buf(), source: err })?;
	}

	let encoded =
		serde_json::to_string(payload).map_err(|err| Error::EncodeCache { source: err })?;
	let mut tmp = path.as_os_str().to_owned();

	tmp.push(".tmp");

	let tmp = PathBuf::from(tmp);

	fs::write(&tmp, encoded)
		.map_err(|err| Error::WriteCache { path: tmp.clone(), source: err })?;
	fs::rename(&tmp, path)
		.map_err(|err| Error::WriteCache { path: path.to_path_buf(), source: err })?;

	Ok(())
}
