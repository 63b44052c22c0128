use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use warden_domain::{Payload, Record, projection};
use warden_storage::{RecordStore, SortOrder};

use crate::{Error, Result, SortBy, SyncService, resolver};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryRequest {
	/// Comma-separated agent UIDs; absent or nil means every agent.
	pub agents: Option<String>,
	/// Comma-separated module names; absent or `*` means every module.
	pub modules: Option<String>,
	/// Caps the number of records considered, newest winning the cap.
	/// Zero or negative means unlimited.
	pub limit: i64,
	/// Maximum record age.
	pub days: i64,
	pub sort: SortBy,
	pub oldest_first: bool,
	/// Drops entries left empty after module filtering.
	pub hide_empty: bool,
}
impl Default for HistoryRequest {
	fn default() -> Self {
		Self {
			agents: None,
			modules: None,
			limit: 100,
			days: 15,
			sort: SortBy::Date,
			oldest_first: false,
			hide_empty: false,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HistoryBucket {
	#[serde(with = "crate::time_serde")]
	pub recorded_at: OffsetDateTime,
	pub agents: BTreeMap<Uuid, Payload>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HistoryEntry {
	#[serde(with = "crate::time_serde")]
	pub recorded_at: OffsetDateTime,
	pub payload: Payload,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AgentHistory {
	pub agent: Uuid,
	pub entries: Vec<HistoryEntry>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum HistoryResponse {
	/// Records nested under their timestamp; agents reporting at the same
	/// instant share a bucket.
	ByDate(Vec<HistoryBucket>),
	/// Records grouped per agent.
	ByAgent(Vec<AgentHistory>),
}

impl<S> SyncService<S>
where
	S: RecordStore,
{
	/// The time-windowed telemetry history. Unlike the current-state
	/// projection, every record in the window is preserved.
	pub async fn historical_agent_data(&self, req: HistoryRequest) -> Result<HistoryResponse> {
		if req.days < 0 {
			return Err(Error::InvalidRequest {
				message: "days must be zero or greater.".to_string(),
			});
		}

		let uids = resolver::parse_uid_list(req.agents.as_deref())?;
		let modules = resolver::parse_module_list(req.modules.as_deref());
		let mut predicate = resolver::telemetry_predicate(uids.as_deref());

		predicate.recorded_since = Some(OffsetDateTime::now_utc() - Duration::days(req.days));

		let limit = u32::try_from(req.limit).ok().filter(|limit| *limit > 0);
		let mut records = self.store.query(&predicate, SortOrder::NewestFirst, limit).await?;

		// Regroup in ascending order so a later sequence overwrites an exact
		// (timestamp, agent) duplicate.
		records.reverse();

		let filtered = |record: &Record| match &modules {
			None => record.payload.clone(),
			Some(modules) => projection::filter_modules(&record.payload, modules),
		};

		match req.sort {
			SortBy::Date => {
				let mut buckets: BTreeMap<OffsetDateTime, BTreeMap<Uuid, Payload>> =
					BTreeMap::new();

				for record in &records {
					buckets
						.entry(record.recorded_at)
						.or_default()
						.insert(record.origin.uid(), filtered(record));
				}

				if req.hide_empty {
					for agents in buckets.values_mut() {
						agents.retain(|_, payload| !payload.is_empty());
					}

					buckets.retain(|_, agents| !agents.is_empty());
				}

				let mut out: Vec<HistoryBucket> = buckets
					.into_iter()
					.map(|(recorded_at, agents)| HistoryBucket { recorded_at, agents })
					.collect();

				if !req.oldest_first {
					out.reverse();
				}

				Ok(HistoryResponse::ByDate(out))
			},
			SortBy::Agent => {
				let mut agents: BTreeMap<Uuid, Vec<HistoryEntry>> = BTreeMap::new();

				for record in &records {
					let payload = filtered(record);

					if req.hide_empty && payload.is_empty() {
						continue;
					}

					agents
						.entry(record.origin.uid())
						.or_default()
						.push(HistoryEntry { recorded_at: record.recorded_at, payload });
				}

				let out = agents
					.into_iter()
					.map(|(agent, mut entries)| {
						if !req.oldest_first {
							entries.reverse();
						}

						AgentHistory { agent, entries }
					})
					.collect();

				Ok(HistoryResponse::ByAgent(out))
			},
		}
	}
}
