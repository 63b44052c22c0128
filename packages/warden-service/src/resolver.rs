use uuid::Uuid;

use warden_domain::{Endpoint, Role, Scope};
use warden_storage::{EndpointMatch, RecordPredicate};

use crate::{Error, Result};

/// Parses a comma-separated UID list.
///
/// `None`, a blank string, and nil UIDs all mean "unspecified": every
/// endpoint of the role. A malformed entry is an error, never a silent
/// non-match.
pub fn parse_uid_list(raw: Option<&str>) -> Result<Option<Vec<Uuid>>> {
	let Some(raw) = raw else {
		return Ok(None);
	};
	let mut uids = Vec::new();

	for entry in raw.split(',') {
		let entry = entry.trim();

		if entry.is_empty() {
			continue;
		}

		let uid = Uuid::parse_str(entry)
			.map_err(|_| Error::InvalidRequest { message: format!("Malformed UID {entry:?}.") })?;

		if uid.is_nil() {
			continue;
		}

		uids.push(uid);
	}

	if uids.is_empty() { Ok(None) } else { Ok(Some(uids)) }
}

/// Parses a comma-separated module list. `None`, a blank string, and a `*`
/// entry all mean "every module".
pub fn parse_module_list(raw: Option<&str>) -> Option<Vec<String>> {
	let raw = raw?;
	let mut modules = Vec::new();

	for entry in raw.split(',') {
		let entry = entry.trim();

		if entry == "*" {
			return None;
		}
		if entry.is_empty() {
			continue;
		}

		modules.push(entry.to_string());
	}

	if modules.is_empty() { None } else { Some(modules) }
}

/// Telemetry is keyed by who wrote it.
pub fn telemetry_predicate(uids: Option<&[Uuid]>) -> RecordPredicate {
	RecordPredicate {
		scope: Some(Scope::AgentData),
		origin: Some(agent_match(uids)),
		require_payload: true,
		..Default::default()
	}
}

/// Agent configuration is keyed by who it is addressed to.
pub fn agent_config_predicate(uids: Option<&[Uuid]>) -> RecordPredicate {
	RecordPredicate {
		scope: Some(Scope::AgentConfigs),
		destiny: Some(agent_match(uids)),
		require_payload: true,
		..Default::default()
	}
}

/// Any record an agent originated counts towards its presence.
pub fn presence_predicate() -> RecordPredicate {
	RecordPredicate {
		origin: Some(EndpointMatch::AnyWithRole(Role::Agent)),
		require_payload: true,
		..Default::default()
	}
}

pub fn server_config_predicate(server: Uuid) -> RecordPredicate {
	RecordPredicate {
		scope: Some(Scope::ServerConfigs),
		destiny: Some(EndpointMatch::Exactly(Endpoint::server(server))),
		require_payload: true,
		..Default::default()
	}
}

fn agent_match(uids: Option<&[Uuid]>) -> EndpointMatch {
	match uids {
		None => EndpointMatch::AnyWithRole(Role::Agent),
		Some(uids) =>
			EndpointMatch::AnyOf(uids.iter().map(|uid| Endpoint::agent(*uid)).collect()),
	}
}
