pub mod agents;
pub mod configs;
pub mod history;
pub mod publish;
pub mod purge;
pub mod resolver;
pub mod server;
pub mod state;
pub mod time_serde;

mod error;

pub use agents::{ActiveAgentsRequest, ActiveAgentsResponse, AgentPresence};
pub use configs::{AgentConfigRequest, AgentConfigResponse, PullConfigRequest, PullConfigResponse};
pub use error::{Error, Result};
pub use history::{AgentHistory, HistoryBucket, HistoryEntry, HistoryRequest, HistoryResponse};
pub use publish::{PublishAgentConfigRequest, PublishTelemetryRequest};
pub use purge::{PurgeRequest, PurgeResponse};
pub use server::{PublishServerConfigRequest, ServerConfigResponse};
pub use state::{AgentStateRequest, AgentStateResponse};

use serde::{Deserialize, Serialize};

/// Presentation order for multi-record reads: by time, or grouped per agent.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
	#[default]
	Date,
	Agent,
}

/// The synchronization core, generic over the record store backend.
pub struct SyncService<S> {
	pub store: S,
}
impl<S> SyncService<S> {
	pub fn new(store: S) -> Self {
		Self { store }
	}
}
