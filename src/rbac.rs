//! Permission-augmentation logic applied when creating administrator roles.
//!
//! The backend rejects roles whose mutation grants lack the matching read grant, so the
//! gateway injects implied parent permissions before submitting a role. The function is
//! pure, deterministic, and idempotent: augmenting an already-augmented list adds
//! nothing.

// self
use crate::_prelude::*;

const MUTATION_SUFFIXES: [&str; 3] = ["-c", "-u", "-d"];

/// Result of augmenting a requested permission list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Augmentation {
	/// Deduplicated feature list including every injected parent permission.
	pub final_features: Vec<String>,
	/// Only the permissions that were injected, in injection order.
	pub added: Vec<String>,
}

/// Ensures every requested feature carries its family's base read permission.
///
/// Two shapes imply a parent grant: a dotted feature (`wifi.venue-c`) implies the
/// namespace read grant (`wifi-r`), and a top-level mutation grant (`admin-c`,
/// `admin-u`, `admin-d`) implies the family read grant (`admin-r`). The output list is
/// deduplicated; input order is preserved with injected grants appended.
pub fn augment<S>(features: &[S]) -> Augmentation
where
	S: AsRef<str>,
{
	let mut seen = BTreeSet::new();
	let mut final_features = Vec::new();
	let mut added = Vec::new();

	for feature in features {
		let feature = feature.as_ref();

		if seen.insert(feature.to_owned()) {
			final_features.push(feature.to_owned());
		}
	}
	for feature in final_features.clone() {
		let Some(family) = implied_read_family(&feature) else {
			continue;
		};
		let read_grant = format!("{family}-r");

		if seen.insert(read_grant.clone()) {
			final_features.push(read_grant.clone());
			added.push(read_grant);
		}
	}

	Augmentation { final_features, added }
}

/// Returns the family whose read grant the feature implies, if any.
fn implied_read_family(feature: &str) -> Option<&str> {
	if let Some((family, _)) = feature.split_once('.') {
		return (!family.is_empty()).then_some(family);
	}

	MUTATION_SUFFIXES
		.iter()
		.find_map(|suffix| feature.strip_suffix(suffix))
		.filter(|family| !family.is_empty())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn dotted_features_imply_the_namespace_read_grant() {
		let result = augment(&["wifi.venue-c"]);

		assert_eq!(result.final_features, vec!["wifi.venue-c", "wifi-r"]);
		assert_eq!(result.added, vec!["wifi-r"]);
	}

	#[test]
	fn top_level_mutation_grants_imply_the_family_read_grant() {
		let result = augment(&["admin-c", "admin-d"]);

		assert_eq!(result.final_features, vec!["admin-c", "admin-d", "admin-r"]);
		assert_eq!(result.added, vec!["admin-r"]);
	}

	#[test]
	fn augmentation_is_idempotent() {
		let first = augment(&["wifi.venue-c", "admin-u"]);
		let second = augment(&first.final_features);

		assert!(second.added.is_empty());
		assert_eq!(second.final_features, first.final_features);
	}

	#[test]
	fn existing_read_grants_are_not_duplicated() {
		let result = augment(&["wifi-r", "wifi.venue-u"]);

		assert_eq!(result.final_features, vec!["wifi-r", "wifi.venue-u"]);
		assert!(result.added.is_empty());
	}

	#[test]
	fn duplicate_inputs_collapse() {
		let result = augment(&["admin-c", "admin-c"]);

		assert_eq!(result.final_features, vec!["admin-c", "admin-r"]);
		assert_eq!(result.added, vec!["admin-r"]);
	}

	#[test]
	fn plain_read_grants_pass_through_untouched() {
		let result = augment(&["switch-r"]);

		assert_eq!(result.final_features, vec!["switch-r"]);
		assert!(result.added.is_empty());
	}
}
