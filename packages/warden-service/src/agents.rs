use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use warden_domain::projection::{self, ProjectionKey};
use warden_storage::{RecordStore, SortOrder};

use crate::{Result, SortBy, SyncService, resolver};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ActiveAgentsRequest {
	#[serde(default)]
	pub sort: SortBy,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AgentPresence {
	pub agent: Uuid,
	#[serde(with = "crate::time_serde")]
	pub last_seen: OffsetDateTime,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ActiveAgentsResponse {
	pub agents: Vec<AgentPresence>,
}

impl<S> SyncService<S>
where
	S: RecordStore,
{
	/// Every agent the store has ever heard from, with the timestamp of its
	/// most recent record of any scope.
	pub async fn active_agents(&self, req: ActiveAgentsRequest) -> Result<ActiveAgentsResponse> {
		let predicate = resolver::presence_predicate();
		let records = self.store.query(&predicate, SortOrder::OldestFirst, None).await?;
		let latest = projection::latest_per_endpoint(records, ProjectionKey::Origin);
		let mut agents: Vec<AgentPresence> = latest
			.into_iter()
			.map(|(uid, record)| AgentPresence { agent: uid, last_seen: record.recorded_at })
			.collect();

		match req.sort {
			SortBy::Date => agents.sort_by(|a, b| {
				b.last_seen.cmp(&a.last_seen).then_with(|| a.agent.cmp(&b.agent))
			}),
			// The fold already yields UID-ascending order.
			SortBy::Agent => {},
		}

		Ok(ActiveAgentsResponse { agents })
	}
}
