//! Name-to-identifier resolution for entities addressed by display name.
//!
//! Compose operations accept venues and privilege groups by display name for
//! ergonomics. Inputs already shaped like an opaque identifier pass through without a
//! listing call; anything else is matched exactly against a full listing, and a miss
//! enumerates every known name so the caller can correct the request.

// crates.io
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	error::NotFoundError,
	http::ApiTransport,
	ops::Gateway,
};

/// Returns `true` when the input is already a canonical 36-character hyphenated hex
/// identifier.
pub fn is_canonical_id(value: &str) -> bool {
	value.len() == 36 && Uuid::try_parse(value).is_ok()
}

impl<T> Gateway<T>
where
	T: ?Sized + ApiTransport,
{
	/// Resolves venue names to identifiers, passing canonical identifiers through.
	///
	/// The listing call is only issued when at least one input actually needs
	/// resolution.
	pub async fn resolve_venue_ids(&self, names: &[String]) -> Result<Vec<String>> {
		if names.iter().all(|name| is_canonical_id(name)) {
			return Ok(names.to_vec());
		}

		let venues = self.list_venues().await?;
		let mut ids = Vec::with_capacity(names.len());

		for name in names {
			if is_canonical_id(name) {
				ids.push(name.clone());

				continue;
			}

			match venues.iter().find(|venue| venue.name == *name) {
				Some(venue) => ids.push(venue.id.clone()),
				None =>
					return Err(NotFoundError {
						kind: "venue",
						name: name.clone(),
						available: venues.iter().map(|venue| venue.name.clone()).collect(),
					}
					.into()),
			}
		}

		Ok(ids)
	}

	/// Resolves a privilege-group name to its identifier, passing canonical identifiers
	/// through.
	pub async fn resolve_privilege_group_id(&self, name: &str) -> Result<String> {
		if is_canonical_id(name) {
			return Ok(name.to_owned());
		}

		let groups = self.list_privilege_groups().await?;

		match groups.iter().find(|group| group.name == name) {
			Some(group) => Ok(group.id.clone()),
			None => Err(NotFoundError {
				kind: "privilege group",
				name: name.to_owned(),
				available: groups.iter().map(|group| group.name.clone()).collect(),
			}
			.into()),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn canonical_detection_requires_the_hyphenated_form() {
		assert!(is_canonical_id("3f2c7a9e-1b4d-4c8a-9f3e-2d6b8a1c5e7f"));
		assert!(!is_canonical_id("3f2c7a9e1b4d4c8a9f3e2d6b8a1c5e7f"), "Simple form must not pass.");
		assert!(!is_canonical_id("Lobby"), "Display names must not pass.");
		assert!(!is_canonical_id(""), "Empty input must not pass.");
	}
}
