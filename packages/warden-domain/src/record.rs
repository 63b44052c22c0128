use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::endpoint::Endpoint;

/// Module name (or config key) to module findings (or config value).
pub type Payload = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
	AgentData,
	AgentConfigs,
	ServerConfigs,
}
impl Scope {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::AgentData => "agent_data",
			Self::AgentConfigs => "agent_configs",
			Self::ServerConfigs => "server_configs",
		}
	}
}
impl fmt::Display for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for Scope {
	type Err = UnknownScopeError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"agent_data" => Ok(Self::AgentData),
			"agent_configs" => Ok(Self::AgentConfigs),
			"server_configs" => Ok(Self::ServerConfigs),
			_ => Err(UnknownScopeError { raw: raw.to_string() }),
		}
	}
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown scope {raw:?}.")]
pub struct UnknownScopeError {
	pub raw: String,
}

/// A persisted document. Immutable once written, except for the
/// `server_configs` upsert path which replaces the payload of the live
/// record sharing `(destiny, scope)`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Record {
	/// Store-assigned sequence. The tie-break when two records share a
	/// `recorded_at`: the higher sequence wins.
	pub seq: i64,
	pub origin: Endpoint,
	pub destiny: Option<Endpoint>,
	pub scope: Scope,
	pub payload: Payload,
	#[serde(with = "time::serde::timestamp")]
	pub recorded_at: OffsetDateTime,
}

/// A record about to be appended; the store assigns `seq`.
#[derive(Clone, Debug)]
pub struct NewRecord {
	pub origin: Endpoint,
	pub destiny: Option<Endpoint>,
	pub scope: Scope,
	pub payload: Payload,
	pub recorded_at: OffsetDateTime,
}
impl NewRecord {
	pub fn telemetry(origin: Endpoint, payload: Payload, recorded_at: OffsetDateTime) -> Self {
		Self { origin, destiny: None, scope: Scope::AgentData, payload, recorded_at }
	}

	pub fn agent_config(
		origin: Endpoint,
		destiny: Endpoint,
		payload: Payload,
		recorded_at: OffsetDateTime,
	) -> Self {
		Self { origin, destiny: Some(destiny), scope: Scope::AgentConfigs, payload, recorded_at }
	}

	pub fn server_config(
		origin: Endpoint,
		destiny: Endpoint,
		payload: Payload,
		recorded_at: OffsetDateTime,
	) -> Self {
		Self { origin, destiny: Some(destiny), scope: Scope::ServerConfigs, payload, recorded_at }
	}
}
