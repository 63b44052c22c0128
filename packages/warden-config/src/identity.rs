use std::{fs, path::Path};

use uuid::Uuid;

use warden_domain::BROADCAST_UID;

/// Loads this endpoint's UID from disk, generating and persisting a fresh
/// one when the file is missing, empty, or unparseable.
///
/// The reserved broadcast UID is never a valid identity; finding it in the
/// file yields the nil UID ("unspecified") so the caller can refuse to
/// publish under it. Persistence failures also degrade to the nil UID
/// rather than failing the caller.
pub fn load_or_create_uid(path: &Path) -> Uuid {
	match fs::read_to_string(path) {
		Ok(raw) => {
			let first = raw.lines().next().unwrap_or("").trim();

			match Uuid::parse_str(first) {
				Ok(uid) if uid == BROADCAST_UID => {
					tracing::warn!(
						?path,
						"UID file holds the reserved broadcast UID. Using the nil UID."
					);

					return Uuid::nil();
				},
				Ok(uid) if !uid.is_nil() => return uid,
				_ if first.is_empty() => {
					tracing::debug!(?path, "UID file is empty. Generating a new UID.");
				},
				_ => {
					tracing::warn!(?path, "UID file is unparseable. Generating a new UID.");
				},
			}
		},
		Err(err) => {
			tracing::debug!(?path, error = %err, "UID file is not readable. Generating a new UID.");
		},
	}

	let uid = Uuid::new_v4();

	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
		&& let Err(err) = fs::create_dir_all(parent)
	{
		tracing::warn!(?path, error = %err, "Failed to persist a new UID. Using the nil UID.");

		return Uuid::nil();
	}
	if let Err(err) = fs::write(path, uid.to_string()) {
		tracing::warn!(?path, error = %err, "Failed to persist a new UID. Using the nil UID.");

		return Uuid::nil();
	}

	uid
}
