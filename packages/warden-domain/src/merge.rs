use crate::record::Payload;

/// Right-biased key union of two payloads.
///
/// Every key of `over` wins over the same key in `base`; keys present in only
/// one side are kept. Governs both broadcast-vs-individual configuration and
/// the local-floor-vs-upstream reconcile: the overlay never deletes a base
/// key, so a key that disappears upstream reverts to its base value on the
/// next merge cycle.
pub fn overlay(base: &Payload, over: &Payload) -> Payload {
	let mut merged = base.clone();

	for (key, value) in over {
		merged.insert(key.clone(), value.clone());
	}

	merged
}
