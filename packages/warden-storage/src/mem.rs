use std::sync::Mutex;

use warden_domain::{NewRecord, Record, Scope};

use crate::{
	BoxFuture, Result,
	store::{RecordPredicate, RecordStore, SortOrder},
};

/// In-memory record store mirroring the Postgres backend's semantics:
/// store-assigned sequences, the `(destiny, scope)` upsert rule, and
/// `(recorded_at, seq)` ordering. Backs the acceptance tests and embedded
/// use without an external database.
#[derive(Debug, Default)]
pub struct MemoryStore {
	inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
	records: Vec<Record>,
	next_seq: i64,
}
impl Inner {
	fn insert(&mut self, record: NewRecord) {
		self.next_seq += 1;
		self.records.push(Record {
			seq: self.next_seq,
			origin: record.origin,
			destiny: record.destiny,
			scope: record.scope,
			payload: record.payload,
			recorded_at: record.recorded_at,
		});
	}
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
		self.inner.lock().unwrap_or_else(|err| err.into_inner())
	}
}

impl RecordStore for MemoryStore {
	fn append<'a>(&'a self, record: NewRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.lock().insert(record);

			Ok(())
		})
	}

	fn upsert_config<'a>(&'a self, record: NewRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut inner = self.lock();

			if record.scope == Scope::ServerConfigs
				&& let Some(live) = inner
					.records
					.iter_mut()
					.find(|r| r.scope == Scope::ServerConfigs && r.destiny == record.destiny)
			{
				live.origin = record.origin;
				live.payload = record.payload;
				live.recorded_at = record.recorded_at;

				return Ok(());
			}

			inner.insert(record);

			Ok(())
		})
	}

	fn query<'a>(
		&'a self,
		predicate: &'a RecordPredicate,
		order: SortOrder,
		limit: Option<u32>,
	) -> BoxFuture<'a, Result<Vec<Record>>> {
		Box::pin(async move {
			let inner = self.lock();
			let mut matched: Vec<Record> = inner
				.records
				.iter()
				.filter(|record| predicate.matches(record))
				.cloned()
				.collect();

			matched.sort_by_key(|record| (record.recorded_at, record.seq));

			if order == SortOrder::NewestFirst {
				matched.reverse();
			}
			if let Some(limit) = limit {
				matched.truncate(limit as usize);
			}

			Ok(matched)
		})
	}

	fn delete<'a>(&'a self, predicate: &'a RecordPredicate) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			let mut inner = self.lock();
			let before = inner.records.len();

			inner.records.retain(|record| !predicate.matches(record));

			Ok((before - inner.records.len()) as u64)
		})
	}
}
