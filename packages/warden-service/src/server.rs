use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use warden_domain::{Endpoint, NewRecord, Payload, Scope};
use warden_storage::{RecordStore, SortOrder};

use crate::{Error, PurgeRequest, PurgeResponse, Result, SyncService, resolver};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PublishServerConfigRequest {
	pub server: Uuid,
	pub origin: Endpoint,
	pub config: Payload,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServerConfigResponse {
	pub config: Payload,
}

impl<S> SyncService<S>
where
	S: RecordStore,
{
	/// Replaces the live published server configuration rather than
	/// appending: publishing the identical payload twice leaves exactly one
	/// record, last writer winning.
	pub async fn publish_server_config(&self, req: PublishServerConfigRequest) -> Result<()> {
		if req.server.is_nil() {
			return Err(Error::InvalidRequest {
				message: "A server UID is required to publish server configuration.".to_string(),
			});
		}

		self.store
			.upsert_config(NewRecord::server_config(
				req.origin,
				Endpoint::server(req.server),
				req.config,
				OffsetDateTime::now_utc(),
			))
			.await?;

		Ok(())
	}

	/// The live published server configuration; empty when none has been
	/// published or the record was retracted.
	pub async fn current_server_config(&self, server: Uuid) -> Result<ServerConfigResponse> {
		let predicate = resolver::server_config_predicate(server);
		let config = self
			.store
			.query(&predicate, SortOrder::NewestFirst, Some(1))
			.await?
			.into_iter()
			.next()
			.map(|record| record.payload)
			.unwrap_or_default();

		Ok(ServerConfigResponse { config })
	}

	/// Retracts the published server configuration immediately.
	pub async fn purge_server_config(&self, server: Uuid) -> Result<PurgeResponse> {
		self.purge_older_than(PurgeRequest {
			scope: Scope::ServerConfigs,
			uid: Some(server),
			days_to_keep: 0,
		})
		.await
	}
}
