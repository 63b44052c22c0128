use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warden_domain::{
	Payload,
	projection::{self, ProjectionKey},
};
use warden_storage::{RecordStore, SortOrder};

use crate::{Result, SyncService, resolver};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AgentStateRequest {
	/// Comma-separated agent UIDs; absent or nil means every agent.
	pub agents: Option<String>,
	/// Comma-separated module names; absent or `*` means every module.
	pub modules: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AgentStateResponse {
	pub agents: BTreeMap<Uuid, Payload>,
}

impl<S> SyncService<S>
where
	S: RecordStore,
{
	/// The latest telemetry payload per agent.
	pub async fn current_agent_state(&self, req: AgentStateRequest) -> Result<AgentStateResponse> {
		let uids = resolver::parse_uid_list(req.agents.as_deref())?;
		let modules = resolver::parse_module_list(req.modules.as_deref());
		let latest = match uids {
			None => {
				let predicate = resolver::telemetry_predicate(None);
				let records = self.store.query(&predicate, SortOrder::OldestFirst, None).await?;

				projection::latest_per_endpoint(records, ProjectionKey::Origin)
			},
			Some(uids) => {
				// One newest-first, limit-one query per endpoint; equivalent
				// to the grouped fold, cheaper.
				let mut latest = BTreeMap::new();

				for uid in uids {
					let predicate = resolver::telemetry_predicate(Some(&[uid]));

					if let Some(record) = self
						.store
						.query(&predicate, SortOrder::NewestFirst, Some(1))
						.await?
						.into_iter()
						.next()
					{
						latest.insert(uid, record);
					}
				}

				latest
			},
		};
		let agents = latest
			.into_iter()
			.map(|(uid, record)| {
				let payload = match &modules {
					None => record.payload,
					Some(modules) => projection::filter_modules(&record.payload, modules),
				};

				(uid, payload)
			})
			.collect();

		Ok(AgentStateResponse { agents })
	}
}
