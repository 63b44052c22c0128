use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved UID addressing every agent at once. Never a real endpoint.
pub const BROADCAST_UID: Uuid = Uuid::from_u128(u128::MAX);

#[derive(Debug, thiserror::Error)]
#[error("Invalid endpoint {raw:?}.")]
pub struct ParseEndpointError {
	pub raw: String,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(into = "String", try_from = "String")]
pub enum Endpoint {
	Agent(Uuid),
	Server(Uuid),
	Broadcast,
}
impl Endpoint {
	/// An agent endpoint; the reserved UID collapses to [`Endpoint::Broadcast`].
	pub fn agent(uid: Uuid) -> Self {
		if uid == BROADCAST_UID { Self::Broadcast } else { Self::Agent(uid) }
	}

	pub fn server(uid: Uuid) -> Self {
		Self::Server(uid)
	}

	pub fn role(&self) -> Role {
		match self {
			Self::Agent(_) | Self::Broadcast => Role::Agent,
			Self::Server(_) => Role::Server,
		}
	}

	pub fn uid(&self) -> Uuid {
		match self {
			Self::Agent(uid) | Self::Server(uid) => *uid,
			Self::Broadcast => BROADCAST_UID,
		}
	}

	pub fn is_broadcast(&self) -> bool {
		matches!(self, Self::Broadcast)
	}
}
impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}", self.role().wire_prefix(), self.uid())
	}
}
impl FromStr for Endpoint {
	type Err = ParseEndpointError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		let err = || ParseEndpointError { raw: raw.to_string() };

		if let Some(uid) = raw.strip_prefix(Role::Agent.wire_prefix()) {
			let uid = Uuid::parse_str(uid).map_err(|_| err())?;

			return Ok(Self::agent(uid));
		}
		if let Some(uid) = raw.strip_prefix(Role::Server.wire_prefix()) {
			let uid = Uuid::parse_str(uid).map_err(|_| err())?;

			return Ok(Self::Server(uid));
		}

		Err(err())
	}
}
impl From<Endpoint> for String {
	fn from(endpoint: Endpoint) -> Self {
		endpoint.to_string()
	}
}
impl TryFrom<String> for Endpoint {
	type Error = ParseEndpointError;

	fn try_from(raw: String) -> Result<Self, Self::Error> {
		raw.parse()
	}
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Role {
	Agent,
	Server,
}
impl Role {
	pub fn wire_prefix(&self) -> &'static str {
		match self {
			Self::Agent => "agent_",
			Self::Server => "server_",
		}
	}
}
