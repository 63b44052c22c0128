use serde_json::json;
use time::{Duration, OffsetDateTime};

use warden_domain::{Endpoint, NewRecord, Scope};
use warden_service::{AgentStateRequest, PurgeRequest};
use warden_storage::RecordStore;

use crate::suite::{payload, service, uid};

#[tokio::test]
async fn purge_respects_the_retention_horizon() {
	let service = service();
	let agent = Endpoint::agent(uid(1));
	let now = OffsetDateTime::now_utc();

	for days_ago in [30_i64, 20, 5, 1] {
		service
			.store
			.append(NewRecord::telemetry(
				agent,
				payload(json!({ "m": days_ago })),
				now - Duration::days(days_ago),
			))
			.await
			.unwrap();
	}

	let purged = service
		.purge_older_than(PurgeRequest { scope: Scope::AgentData, uid: None, days_to_keep: 14 })
		.await
		.unwrap();

	assert_eq!(purged.deleted, 2);

	// Records within the horizon are untouched; the newest survives as the
	// current state.
	let state = service.current_agent_state(AgentStateRequest::default()).await.unwrap();

	assert_eq!(state.agents[&uid(1)]["m"], json!(1));
}

#[tokio::test]
async fn a_targeted_purge_only_touches_the_addressed_agent() {
	let service = service();
	let server = Endpoint::server(uid(0xd0));
	let now = OffsetDateTime::now_utc();

	for agent in [uid(1), uid(2)] {
		service
			.store
			.append(NewRecord::agent_config(
				server,
				Endpoint::agent(agent),
				payload(json!({ "interval": 60 })),
				now,
			))
			.await
			.unwrap();
	}

	let purged = service
		.purge_older_than(PurgeRequest {
			scope: Scope::AgentConfigs,
			uid: Some(uid(1)),
			days_to_keep: 0,
		})
		.await
		.unwrap();

	assert_eq!(purged.deleted, 1);

	let listing = service
		.current_agent_config(warden_service::AgentConfigRequest {
			agents: None,
			merge_broadcast: false,
		})
		.await
		.unwrap();

	assert!(!listing.agents.contains_key(&uid(1)));
	assert!(listing.agents.contains_key(&uid(2)));
}

#[tokio::test]
async fn a_purge_matching_nothing_reports_zero() {
	let service = service();
	let purged = service
		.purge_older_than(PurgeRequest {
			scope: Scope::AgentConfigs,
			uid: Some(uid(7)),
			days_to_keep: 0,
		})
		.await
		.unwrap();

	assert_eq!(purged.deleted, 0);
}

#[tokio::test]
async fn negative_retention_is_an_invalid_request() {
	let service = service();
	let result = service
		.purge_older_than(PurgeRequest { scope: Scope::AgentData, uid: None, days_to_keep: -1 })
		.await;

	assert!(matches!(result, Err(warden_service::Error::InvalidRequest { .. })));
}

#[tokio::test]
async fn purging_telemetry_leaves_other_scopes_alone() {
	let service = service();
	let server = Endpoint::server(uid(0xd0));
	let old = OffsetDateTime::now_utc() - Duration::days(30);

	service
		.store
		.append(NewRecord::telemetry(Endpoint::agent(uid(1)), payload(json!({ "m": 1 })), old))
		.await
		.unwrap();
	service
		.store
		.append(NewRecord::agent_config(
			server,
			Endpoint::agent(uid(1)),
			payload(json!({ "interval": 60 })),
			old,
		))
		.await
		.unwrap();

	let purged = service
		.purge_older_than(PurgeRequest { scope: Scope::AgentData, uid: None, days_to_keep: 0 })
		.await
		.unwrap();

	assert_eq!(purged.deleted, 1);

	let configs = service
		.current_agent_config(warden_service::AgentConfigRequest {
			agents: None,
			merge_broadcast: false,
		})
		.await
		.unwrap();

	assert!(configs.agents.contains_key(&uid(1)));
}
