use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use warden_domain::{Endpoint, Scope};
use warden_storage::{EndpointMatch, RecordPredicate, RecordStore};

use crate::{Error, Result, SyncService};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PurgeRequest {
	pub scope: Scope,
	/// Narrows the purge to one endpoint: the origin for telemetry, the
	/// destiny for configuration scopes.
	pub uid: Option<Uuid>,
	/// Zero means "delete all of this scope now".
	pub days_to_keep: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PurgeResponse {
	pub deleted: u64,
}

impl<S> SyncService<S>
where
	S: RecordStore,
{
	/// Deletes every record of the scope older than the retention horizon
	/// and reports the exact count, zero included.
	pub async fn purge_older_than(&self, req: PurgeRequest) -> Result<PurgeResponse> {
		if req.days_to_keep < 0 {
			return Err(Error::InvalidRequest {
				message: "days_to_keep must be zero or greater.".to_string(),
			});
		}

		let cutoff = OffsetDateTime::now_utc() - Duration::days(req.days_to_keep);
		let mut predicate = RecordPredicate {
			scope: Some(req.scope),
			recorded_before: Some(cutoff),
			..Default::default()
		};

		if let Some(uid) = req.uid {
			match req.scope {
				Scope::AgentData =>
					predicate.origin = Some(EndpointMatch::Exactly(Endpoint::agent(uid))),
				Scope::AgentConfigs =>
					predicate.destiny = Some(EndpointMatch::Exactly(Endpoint::agent(uid))),
				Scope::ServerConfigs =>
					predicate.destiny = Some(EndpointMatch::Exactly(Endpoint::server(uid))),
			}
		}

		let deleted = self.store.delete(&predicate).await?;

		tracing::info!(scope = %req.scope, deleted, "Purged records older than the cutoff.");

		Ok(PurgeResponse { deleted })
	}
}
