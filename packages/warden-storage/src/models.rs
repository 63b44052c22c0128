use time::OffsetDateTime;

use warden_domain::{Endpoint, Record, Scope};

#[derive(Debug, sqlx::FromRow)]
pub struct RecordRow {
	pub seq: i64,
	pub origin: String,
	pub destiny: Option<String>,
	pub scope: String,
	pub payload: Option<serde_json::Value>,
	pub recorded_at: OffsetDateTime,
}
impl RecordRow {
	/// Converts a raw row into a domain record.
	///
	/// Rows without an object payload, or with addressing a foreign writer
	/// malformed, are dropped with a diagnostic rather than failing the query.
	pub fn into_record(self) -> Option<Record> {
		let Some(serde_json::Value::Object(payload)) = self.payload else {
			tracing::debug!(seq = self.seq, "Ignoring record without an object payload.");

			return None;
		};
		let origin = match self.origin.parse::<Endpoint>() {
			Ok(origin) => origin,
			Err(err) => {
				tracing::debug!(seq = self.seq, error = %err, "Ignoring record with an invalid origin.");

				return None;
			},
		};
		let destiny = match self.destiny {
			None => None,
			Some(raw) => match raw.parse::<Endpoint>() {
				Ok(destiny) => Some(destiny),
				Err(err) => {
					tracing::debug!(seq = self.seq, error = %err, "Ignoring record with an invalid destiny.");

					return None;
				},
			},
		};
		let scope = match self.scope.parse::<Scope>() {
			Ok(scope) => scope,
			Err(err) => {
				tracing::debug!(seq = self.seq, error = %err, "Ignoring record with an unknown scope.");

				return None;
			},
		};

		Some(Record {
			seq: self.seq,
			origin,
			destiny,
			scope,
			payload,
			recorded_at: self.recorded_at,
		})
	}
}
