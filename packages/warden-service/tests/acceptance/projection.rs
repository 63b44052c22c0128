use serde_json::json;

use warden_service::{AgentStateRequest, PublishTelemetryRequest};

use crate::suite::{payload, service, uid};

#[tokio::test]
async fn the_last_written_record_is_the_current_state() {
	let service = service();
	let agent = uid(1);

	for finding in ["x", "y"] {
		service
			.publish_telemetry(PublishTelemetryRequest {
				agent,
				payload: payload(json!({ "portscanner": { "host1": { "finding": finding } } })),
			})
			.await
			.unwrap();
	}

	let state = service
		.current_agent_state(AgentStateRequest {
			agents: Some(agent.to_string()),
			modules: Some("portscanner".to_string()),
		})
		.await
		.unwrap();

	assert_eq!(state.agents.len(), 1);
	assert_eq!(
		state.agents[&agent]["portscanner"],
		json!({ "host1": { "finding": "y" } }),
	);
}

#[tokio::test]
async fn module_filter_keys_are_the_intersection() {
	let service = service();
	let agent = uid(1);

	service
		.publish_telemetry(PublishTelemetryRequest {
			agent,
			payload: payload(json!({ "portscanner": { "hosts": 2 }, "platform": { "cpu": 1 } })),
		})
		.await
		.unwrap();

	let state = service
		.current_agent_state(AgentStateRequest {
			agents: None,
			modules: Some("portscanner,nonexistent".to_string()),
		})
		.await
		.unwrap();
	let filtered = &state.agents[&agent];

	assert_eq!(filtered.len(), 1);
	assert!(filtered.contains_key("portscanner"));
	assert!(!filtered.contains_key("platform"));
	assert!(!filtered.contains_key("nonexistent"));
}

#[tokio::test]
async fn uid_list_narrows_the_projection() {
	let service = service();
	let (a, b) = (uid(1), uid(2));

	for agent in [a, b] {
		service
			.publish_telemetry(PublishTelemetryRequest {
				agent,
				payload: payload(json!({ "platform": { "agent": agent.to_string() } })),
			})
			.await
			.unwrap();
	}

	let narrowed = service
		.current_agent_state(AgentStateRequest { agents: Some(a.to_string()), modules: None })
		.await
		.unwrap();

	assert_eq!(narrowed.agents.len(), 1);
	assert!(narrowed.agents.contains_key(&a));

	// The nil UID means "unspecified", so everyone reports.
	let all = service
		.current_agent_state(AgentStateRequest {
			agents: Some("00000000-0000-0000-0000-000000000000".to_string()),
			modules: None,
		})
		.await
		.unwrap();

	assert_eq!(all.agents.len(), 2);
}

#[tokio::test]
async fn the_broadcast_uid_cannot_publish_telemetry() {
	let service = service();
	let result = service
		.publish_telemetry(PublishTelemetryRequest {
			agent: warden_domain::BROADCAST_UID,
			payload: payload(json!({ "portscanner": {} })),
		})
		.await;

	assert!(result.is_err());

	let nil = service
		.publish_telemetry(PublishTelemetryRequest {
			agent: uuid::Uuid::nil(),
			payload: payload(json!({ "portscanner": {} })),
		})
		.await;

	assert!(nil.is_err());
}

#[tokio::test]
async fn malformed_uid_lists_are_invalid_requests() {
	let service = service();
	let result = service
		.current_agent_state(AgentStateRequest {
			agents: Some("definitely-not-a-uid".to_string()),
			modules: None,
		})
		.await;

	assert!(matches!(result, Err(warden_service::Error::InvalidRequest { .. })));
}
