use serde_json::json;
use time::{Duration, OffsetDateTime};

use warden_domain::{Endpoint, NewRecord};
use warden_service::{HistoryRequest, HistoryResponse, SortBy};
use warden_storage::RecordStore;

use crate::suite::{payload, service, uid};

async fn seed(
	service: &warden_service::SyncService<warden_storage::mem::MemoryStore>,
	agent: u128,
	minutes_ago: i64,
	value: serde_json::Value,
) {
	service
		.store
		.append(NewRecord::telemetry(
			Endpoint::agent(uid(agent)),
			payload(value),
			OffsetDateTime::now_utc() - Duration::minutes(minutes_ago),
		))
		.await
		.unwrap();
}

fn by_date(response: HistoryResponse) -> Vec<warden_service::HistoryBucket> {
	match response {
		HistoryResponse::ByDate(buckets) => buckets,
		HistoryResponse::ByAgent(_) => panic!("expected date buckets"),
	}
}

#[tokio::test]
async fn newest_first_by_default_oldest_first_on_request() {
	let service = service();

	seed(&service, 1, 30, json!({ "m": 1 })).await;
	seed(&service, 1, 10, json!({ "m": 2 })).await;
	seed(&service, 1, 20, json!({ "m": 3 })).await;

	let newest = by_date(
		service.historical_agent_data(HistoryRequest::default()).await.unwrap(),
	);

	assert_eq!(newest.len(), 3);
	assert!(newest.windows(2).all(|pair| pair[0].recorded_at >= pair[1].recorded_at));

	let oldest = by_date(
		service
			.historical_agent_data(HistoryRequest { oldest_first: true, ..Default::default() })
			.await
			.unwrap(),
	);

	assert!(oldest.windows(2).all(|pair| pair[0].recorded_at <= pair[1].recorded_at));
}

#[tokio::test]
async fn every_record_in_the_window_is_preserved() {
	let service = service();

	// The current-state projection would collapse these to one.
	seed(&service, 1, 30, json!({ "m": 1 })).await;
	seed(&service, 1, 20, json!({ "m": 2 })).await;

	let buckets = by_date(
		service.historical_agent_data(HistoryRequest::default()).await.unwrap(),
	);

	assert_eq!(buckets.len(), 2);
}

#[tokio::test]
async fn the_age_window_excludes_old_records() {
	let service = service();

	seed(&service, 1, 60 * 24 * 30, json!({ "m": "old" })).await;
	seed(&service, 1, 10, json!({ "m": "fresh" })).await;

	let buckets = by_date(
		service
			.historical_agent_data(HistoryRequest { days: 15, ..Default::default() })
			.await
			.unwrap(),
	);

	assert_eq!(buckets.len(), 1);
	assert!(buckets[0].agents.values().all(|payload| payload["m"] == json!("fresh")));
}

#[tokio::test]
async fn the_newest_records_win_the_cap() {
	let service = service();

	for minutes_ago in [50, 40, 30, 20, 10] {
		seed(&service, 1, minutes_ago, json!({ "m": minutes_ago })).await;
	}

	let capped = by_date(
		service
			.historical_agent_data(HistoryRequest {
				limit: 2,
				oldest_first: true,
				..Default::default()
			})
			.await
			.unwrap(),
	);

	assert_eq!(capped.len(), 2);
	assert!(capped[0].agents.values().all(|payload| payload["m"] == json!(20)));
	assert!(capped[1].agents.values().all(|payload| payload["m"] == json!(10)));

	// Zero and below lift the cap.
	let unlimited = by_date(
		service
			.historical_agent_data(HistoryRequest { limit: 0, ..Default::default() })
			.await
			.unwrap(),
	);

	assert_eq!(unlimited.len(), 5);
}

#[tokio::test]
async fn hide_empty_drops_filtered_out_buckets() {
	let service = service();

	seed(&service, 1, 20, json!({ "platform": { "cpu": 1 } })).await;
	seed(&service, 2, 10, json!({ "portscanner": { "hosts": 2 } })).await;

	let kept = by_date(
		service
			.historical_agent_data(HistoryRequest {
				modules: Some("portscanner".to_string()),
				hide_empty: true,
				..Default::default()
			})
			.await
			.unwrap(),
	);

	assert_eq!(kept.len(), 1);
	assert!(kept[0].agents.contains_key(&uid(2)));

	let unhidden = by_date(
		service
			.historical_agent_data(HistoryRequest {
				modules: Some("portscanner".to_string()),
				hide_empty: false,
				..Default::default()
			})
			.await
			.unwrap(),
	);

	assert_eq!(unhidden.len(), 2);
}

#[tokio::test]
async fn agent_sort_groups_records_per_agent() {
	let service = service();

	seed(&service, 2, 30, json!({ "m": 1 })).await;
	seed(&service, 1, 20, json!({ "m": 2 })).await;
	seed(&service, 2, 10, json!({ "m": 3 })).await;

	let response = service
		.historical_agent_data(HistoryRequest { sort: SortBy::Agent, ..Default::default() })
		.await
		.unwrap();
	let HistoryResponse::ByAgent(agents) = response else {
		panic!("expected per-agent grouping");
	};

	assert_eq!(agents.len(), 2);
	assert_eq!(agents[0].agent, uid(1));
	assert_eq!(agents[0].entries.len(), 1);
	assert_eq!(agents[1].agent, uid(2));
	assert_eq!(agents[1].entries.len(), 2);
	// Newest first within each agent by default.
	assert_eq!(agents[1].entries[0].payload["m"], json!(3));
}

#[tokio::test]
async fn negative_ages_are_invalid_requests() {
	let service = service();
	let result = service
		.historical_agent_data(HistoryRequest { days: -1, ..Default::default() })
		.await;

	assert!(matches!(result, Err(warden_service::Error::InvalidRequest { .. })));
}
