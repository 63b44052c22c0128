use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use warden_domain::{Endpoint, NewRecord, Payload};
use warden_storage::RecordStore;

use crate::{Error, Result, SyncService};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PublishTelemetryRequest {
	pub agent: Uuid,
	pub payload: Payload,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PublishAgentConfigRequest {
	/// A real agent UID, or the reserved broadcast UID for every agent.
	pub destiny: Uuid,
	pub origin: Endpoint,
	pub config: Payload,
}

impl<S> SyncService<S>
where
	S: RecordStore,
{
	/// Appends one telemetry record; the write path bypasses every read
	/// component.
	pub async fn publish_telemetry(&self, req: PublishTelemetryRequest) -> Result<()> {
		if req.agent.is_nil() {
			return Err(Error::InvalidRequest {
				message: "An agent UID is required to publish telemetry.".to_string(),
			});
		}

		let origin = Endpoint::agent(req.agent);

		if origin.is_broadcast() {
			return Err(Error::InvalidRequest {
				message: "The broadcast UID cannot publish telemetry.".to_string(),
			});
		}

		self.store
			.append(NewRecord::telemetry(origin, req.payload, OffsetDateTime::now_utc()))
			.await?;

		Ok(())
	}

	/// Appends one configuration record addressed to an agent or to every
	/// agent at once. Individual configuration published later does not
	/// replace this record; precedence is resolved at read time.
	pub async fn publish_agent_config(&self, req: PublishAgentConfigRequest) -> Result<()> {
		if req.destiny.is_nil() {
			return Err(Error::InvalidRequest {
				message: "A destiny UID or the broadcast UID is required.".to_string(),
			});
		}

		let destiny = Endpoint::agent(req.destiny);

		self.store
			.append(NewRecord::agent_config(
				req.origin,
				destiny,
				req.config,
				OffsetDateTime::now_utc(),
			))
			.await?;

		Ok(())
	}
}
