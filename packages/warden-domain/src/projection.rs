use std::collections::BTreeMap;

use uuid::Uuid;

use crate::record::{Payload, Record};

/// Which endpoint field groups a projection: telemetry belongs to whoever
/// wrote it, configuration to whoever it is addressed to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProjectionKey {
	Origin,
	Destiny,
}
impl ProjectionKey {
	fn uid_of(&self, record: &Record) -> Option<Uuid> {
		match self {
			Self::Origin => Some(record.origin.uid()),
			Self::Destiny => record.destiny.map(|destiny| destiny.uid()),
		}
	}
}

/// Reduces a stream of records down to the most recent one per endpoint.
///
/// Input order does not matter: the fold keeps, per UID, the record with the
/// greatest `(recorded_at, seq)`. Records missing the grouping field are
/// dropped.
pub fn latest_per_endpoint(
	records: impl IntoIterator<Item = Record>,
	key: ProjectionKey,
) -> BTreeMap<Uuid, Record> {
	let mut latest = BTreeMap::<Uuid, Record>::new();

	for record in records {
		let Some(uid) = key.uid_of(&record) else {
			continue;
		};

		match latest.get(&uid) {
			Some(current)
				if (current.recorded_at, current.seq) >= (record.recorded_at, record.seq) => {},
			_ => {
				latest.insert(uid, record);
			},
		}
	}

	latest
}

/// Keeps only the named top-level payload keys. Unknown names simply yield
/// an absent key.
pub fn filter_modules(payload: &Payload, modules: &[String]) -> Payload {
	modules
		.iter()
		.filter_map(|module| {
			payload.get(module).map(|value| (module.clone(), value.clone()))
		})
		.collect()
}
