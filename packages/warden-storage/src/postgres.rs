use sqlx::{Postgres, QueryBuilder};

use warden_domain::NewRecord;

use crate::{
	BoxFuture, Result,
	db::Db,
	models::RecordRow,
	store::{EndpointMatch, RecordPredicate, RecordStore, SortOrder},
};

impl RecordStore for Db {
	fn append<'a>(&'a self, record: NewRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			sqlx::query(
				"\
INSERT INTO sync_records (origin, destiny, scope, payload, recorded_at)
VALUES ($1, $2, $3, $4, $5)",
			)
			.bind(record.origin.to_string())
			.bind(record.destiny.map(|destiny| destiny.to_string()))
			.bind(record.scope.as_str())
			.bind(serde_json::Value::Object(record.payload))
			.bind(record.recorded_at)
			.execute(&self.pool)
			.await?;

			Ok(())
		})
	}

	fn upsert_config<'a>(&'a self, record: NewRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			sqlx::query(
				"\
INSERT INTO sync_records (origin, destiny, scope, payload, recorded_at)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (destiny, scope) WHERE scope = 'server_configs'
DO UPDATE SET
	origin = EXCLUDED.origin,
	payload = EXCLUDED.payload,
	recorded_at = EXCLUDED.recorded_at",
			)
			.bind(record.origin.to_string())
			.bind(record.destiny.map(|destiny| destiny.to_string()))
			.bind(record.scope.as_str())
			.bind(serde_json::Value::Object(record.payload))
			.bind(record.recorded_at)
			.execute(&self.pool)
			.await?;

			Ok(())
		})
	}

	fn query<'a>(
		&'a self,
		predicate: &'a RecordPredicate,
		order: SortOrder,
		limit: Option<u32>,
	) -> BoxFuture<'a, Result<Vec<warden_domain::Record>>> {
		Box::pin(async move {
			let mut builder = QueryBuilder::new(
				"SELECT seq, origin, destiny, scope, payload, recorded_at FROM sync_records",
			);

			push_predicate(&mut builder, predicate);
			builder.push(match order {
				SortOrder::NewestFirst => " ORDER BY recorded_at DESC, seq DESC",
				SortOrder::OldestFirst => " ORDER BY recorded_at ASC, seq ASC",
			});

			if let Some(limit) = limit {
				builder.push(" LIMIT ");
				builder.push_bind(i64::from(limit));
			}

			let rows: Vec<RecordRow> = builder.build_query_as().fetch_all(&self.pool).await?;

			Ok(rows.into_iter().filter_map(RecordRow::into_record).collect())
		})
	}

	fn delete<'a>(&'a self, predicate: &'a RecordPredicate) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			let mut builder = QueryBuilder::new("DELETE FROM sync_records");

			push_predicate(&mut builder, predicate);

			let result = builder.build().execute(&self.pool).await?;

			Ok(result.rows_affected())
		})
	}
}

fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &RecordPredicate) {
	builder.push(" WHERE TRUE");

	if predicate.require_payload {
		builder.push(" AND payload IS NOT NULL");
	}
	if let Some(scope) = predicate.scope {
		builder.push(" AND scope = ");
		builder.push_bind(scope.as_str());
	}
	if let Some(origin) = &predicate.origin {
		push_endpoint_match(builder, "origin", origin);
	}
	if let Some(destiny) = &predicate.destiny {
		push_endpoint_match(builder, "destiny", destiny);
	}
	if let Some(since) = predicate.recorded_since {
		builder.push(" AND recorded_at >= ");
		builder.push_bind(since);
	}
	if let Some(before) = predicate.recorded_before {
		builder.push(" AND recorded_at < ");
		builder.push_bind(before);
	}
}

fn push_endpoint_match(
	builder: &mut QueryBuilder<'_, Postgres>,
	column: &str,
	matcher: &EndpointMatch,
) {
	match matcher {
		EndpointMatch::Exactly(endpoint) => {
			builder.push(format!(" AND {column} = "));
			builder.push_bind(endpoint.to_string());
		},
		EndpointMatch::AnyOf(endpoints) => {
			if endpoints.is_empty() {
				builder.push(" AND FALSE");

				return;
			}

			builder.push(format!(" AND {column} IN ("));

			let mut separated = builder.separated(", ");

			for endpoint in endpoints {
				separated.push_bind(endpoint.to_string());
			}

			separated.push_unseparated(")");
		},
		EndpointMatch::AnyWithRole(role) => {
			// `_` is a LIKE wildcard; match the prefix literally.
			builder.push(format!(" AND {column} LIKE "));
			builder.push_bind(format!("{}%", role.wire_prefix().replace('_', "\\_")));
		},
	}
}
