use serde_json::json;

use warden_domain::{Endpoint, Scope};
use warden_service::PublishServerConfigRequest;
use warden_storage::{EndpointMatch, RecordPredicate, RecordStore, SortOrder};

use crate::suite::{payload, service, uid};

#[tokio::test]
async fn republishing_leaves_exactly_one_live_record() {
	let service = service();
	let server = uid(0xd0);

	for _ in 0..2 {
		service
			.publish_server_config(PublishServerConfigRequest {
				server,
				origin: Endpoint::server(server),
				config: payload(json!({ "history_days_to_keep": "14" })),
			})
			.await
			.unwrap();
	}

	let predicate = RecordPredicate {
		scope: Some(Scope::ServerConfigs),
		destiny: Some(EndpointMatch::Exactly(Endpoint::server(server))),
		require_payload: true,
		..Default::default()
	};
	let live = service.store.query(&predicate, SortOrder::NewestFirst, None).await.unwrap();

	assert_eq!(live.len(), 1);
}

#[tokio::test]
async fn the_last_writer_wins() {
	let service = service();
	let server = uid(0xd0);

	for days in ["14", "30"] {
		service
			.publish_server_config(PublishServerConfigRequest {
				server,
				origin: Endpoint::server(server),
				config: payload(json!({ "history_days_to_keep": days })),
			})
			.await
			.unwrap();
	}

	let current = service.current_server_config(server).await.unwrap();

	assert_eq!(current.config["history_days_to_keep"], json!("30"));
}

#[tokio::test]
async fn retraction_empties_the_published_config() {
	let service = service();
	let server = uid(0xd0);

	service
		.publish_server_config(PublishServerConfigRequest {
			server,
			origin: Endpoint::server(server),
			config: payload(json!({ "history_days_to_keep": "14" })),
		})
		.await
		.unwrap();

	let purged = service.purge_server_config(server).await.unwrap();

	assert_eq!(purged.deleted, 1);

	let current = service.current_server_config(server).await.unwrap();

	assert!(current.config.is_empty());

	// Retracting again is a zero count, not an error.
	assert_eq!(service.purge_server_config(server).await.unwrap().deleted, 0);
}

#[tokio::test]
async fn an_unpublished_config_reads_as_empty() {
	let service = service();

	assert!(service.current_server_config(uid(0xd1)).await.unwrap().config.is_empty());
}

#[tokio::test]
async fn the_nil_server_uid_is_rejected() {
	let service = service();
	let result = service
		.publish_server_config(PublishServerConfigRequest {
			server: uuid::Uuid::nil(),
			origin: Endpoint::server(uid(0xd0)),
			config: payload(json!({})),
		})
		.await;

	assert!(matches!(result, Err(warden_service::Error::InvalidRequest { .. })));
}
