// Shared helpers for the acceptance suite; every test runs against the
// in-memory store.

use uuid::Uuid;

use warden_domain::Payload;
use warden_service::SyncService;
use warden_storage::mem::MemoryStore;

pub fn service() -> SyncService<MemoryStore> {
	SyncService::new(MemoryStore::new())
}

pub fn payload(value: serde_json::Value) -> Payload {
	match value {
		serde_json::Value::Object(map) => map,
		_ => panic!("expected an object"),
	}
}

pub fn uid(n: u128) -> Uuid {
	Uuid::from_u128(n)
}
