use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warden_domain::{
	Endpoint, Payload, Record, Scope, merge,
	projection::{self, ProjectionKey},
};
use warden_storage::{EndpointMatch, RecordPredicate, RecordStore, SortOrder};

use crate::{Error, Result, SyncService, resolver};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AgentConfigRequest {
	/// Comma-separated agent UIDs; absent or nil means every configured
	/// destiny, the broadcast pseudo-agent included.
	pub agents: Option<String>,
	#[serde(default)]
	pub merge_broadcast: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AgentConfigResponse {
	pub agents: BTreeMap<Uuid, Payload>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PullConfigRequest {
	pub agent: Uuid,
	/// Narrows the pull to one record category; absent means any record
	/// addressed to the agent.
	pub scope: Option<Scope>,
	#[serde(default)]
	pub include_broadcast: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PullConfigResponse {
	pub config: Payload,
}

impl<S> SyncService<S>
where
	S: RecordStore,
{
	/// The latest configuration payload per destiny.
	///
	/// With `merge_broadcast`, each payload is the broadcast configuration
	/// overlaid by the individually addressed one, individual keys winning.
	/// A requested agent with no individual configuration still inherits the
	/// broadcast payload (possibly empty; never an error).
	pub async fn current_agent_config(
		&self,
		req: AgentConfigRequest,
	) -> Result<AgentConfigResponse> {
		let uids = resolver::parse_uid_list(req.agents.as_deref())?;
		let broadcast = if req.merge_broadcast {
			self.latest_addressed_to(Endpoint::Broadcast, Some(Scope::AgentConfigs))
				.await?
				.map(|record| record.payload)
				.unwrap_or_default()
		} else {
			Payload::new()
		};
		let mut agents = BTreeMap::new();

		match uids {
			None => {
				let predicate = resolver::agent_config_predicate(None);
				let records = self.store.query(&predicate, SortOrder::OldestFirst, None).await?;

				for (uid, record) in
					projection::latest_per_endpoint(records, ProjectionKey::Destiny)
				{
					agents.insert(uid, merge::overlay(&broadcast, &record.payload));
				}
			},
			Some(uids) =>
				for uid in uids {
					let individual = self
						.latest_addressed_to(Endpoint::agent(uid), Some(Scope::AgentConfigs))
						.await?
						.map(|record| record.payload);

					match individual {
						Some(payload) => {
							agents.insert(uid, merge::overlay(&broadcast, &payload));
						},
						None if req.merge_broadcast => {
							agents.insert(uid, broadcast.clone());
						},
						None => {},
					}
				},
		}

		Ok(AgentConfigResponse { agents })
	}

	/// The agent-side pull: the configuration addressed to one agent,
	/// optionally inheriting broadcast keys it does not override.
	pub async fn pull_agent_config(&self, req: PullConfigRequest) -> Result<PullConfigResponse> {
		if req.agent.is_nil() {
			return Err(Error::InvalidRequest {
				message: "An agent UID is required to pull configuration.".to_string(),
			});
		}

		let own = Endpoint::agent(req.agent);

		if own.is_broadcast() {
			return Err(Error::InvalidRequest {
				message: "The broadcast UID is not a real agent.".to_string(),
			});
		}

		let individual = self
			.latest_addressed_to(own, req.scope)
			.await?
			.map(|record| record.payload)
			.unwrap_or_default();
		let config = if req.include_broadcast {
			let broadcast = self
				.latest_addressed_to(Endpoint::Broadcast, req.scope)
				.await?
				.map(|record| record.payload)
				.unwrap_or_default();

			merge::overlay(&broadcast, &individual)
		} else {
			individual
		};

		Ok(PullConfigResponse { config })
	}

	pub(crate) async fn latest_addressed_to(
		&self,
		destiny: Endpoint,
		scope: Option<Scope>,
	) -> Result<Option<Record>> {
		let predicate = RecordPredicate {
			scope,
			destiny: Some(EndpointMatch::Exactly(destiny)),
			require_payload: true,
			..Default::default()
		};

		Ok(self
			.store
			.query(&predicate, SortOrder::NewestFirst, Some(1))
			.await?
			.into_iter()
			.next())
	}
}
