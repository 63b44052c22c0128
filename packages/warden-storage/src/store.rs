use time::OffsetDateTime;

use warden_domain::{Endpoint, NewRecord, Record, Role, Scope};

use crate::{BoxFuture, Result};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortOrder {
	#[default]
	NewestFirst,
	OldestFirst,
}

#[derive(Clone, Debug)]
pub enum EndpointMatch {
	Exactly(Endpoint),
	AnyOf(Vec<Endpoint>),
	AnyWithRole(Role),
}
impl EndpointMatch {
	fn matches(&self, endpoint: Option<Endpoint>) -> bool {
		let Some(endpoint) = endpoint else {
			return false;
		};

		match self {
			Self::Exactly(expected) => *expected == endpoint,
			Self::AnyOf(expected) => expected.contains(&endpoint),
			Self::AnyWithRole(role) => endpoint.role() == *role,
		}
	}
}

/// A typed store predicate. Both backends interpret it identically; the
/// in-memory backend evaluates [`RecordPredicate::matches`] directly and the
/// Postgres backend renders the equivalent `WHERE` clause.
#[derive(Clone, Debug, Default)]
pub struct RecordPredicate {
	pub scope: Option<Scope>,
	pub origin: Option<EndpointMatch>,
	pub destiny: Option<EndpointMatch>,
	pub recorded_since: Option<OffsetDateTime>,
	pub recorded_before: Option<OffsetDateTime>,
	/// Excludes documents written without a payload; set on every read path.
	pub require_payload: bool,
}
impl RecordPredicate {
	pub fn matches(&self, record: &Record) -> bool {
		if let Some(scope) = self.scope
			&& record.scope != scope
		{
			return false;
		}
		if let Some(origin) = &self.origin
			&& !origin.matches(Some(record.origin))
		{
			return false;
		}
		if let Some(destiny) = &self.destiny
			&& !destiny.matches(record.destiny)
		{
			return false;
		}
		if let Some(since) = self.recorded_since
			&& record.recorded_at < since
		{
			return false;
		}
		if let Some(before) = self.recorded_before
			&& record.recorded_at >= before
		{
			return false;
		}

		true
	}
}

/// The append-only record store.
///
/// Implementations never retry; a failure is surfaced as a typed error and
/// retry policy belongs to the caller.
pub trait RecordStore
where
	Self: Send + Sync,
{
	fn append<'a>(&'a self, record: NewRecord) -> BoxFuture<'a, Result<()>>;

	/// Conditional replace-or-insert keyed on `(destiny, scope)`. The only
	/// write that is not an append; it keeps at most one live
	/// `server_configs` record per destiny, last writer winning.
	fn upsert_config<'a>(&'a self, record: NewRecord) -> BoxFuture<'a, Result<()>>;

	fn query<'a>(
		&'a self,
		predicate: &'a RecordPredicate,
		order: SortOrder,
		limit: Option<u32>,
	) -> BoxFuture<'a, Result<Vec<Record>>>;

	fn delete<'a>(&'a self, predicate: &'a RecordPredicate) -> BoxFuture<'a, Result<u64>>;
}
