//! Venue operations.
//!
//! Venue mutations report completion through the timestamp-gated activity vocabulary,
//! so every mutating call here polls with [`StatusPolicy::EndDatetimeGated`].

// self
use crate::{
	_prelude::*,
	activity::{PollOutcome, PollSettings, StatusPolicy},
	http::{ApiTransport, Method, encode_json},
	obs::OpKind,
	ops::{Gateway, Mutation, Tracking},
};

const POLICY: StatusPolicy = StatusPolicy::EndDatetimeGated;

/// Street address attached to a venue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueAddress {
	/// Street line.
	pub address_line: String,
	/// City name.
	pub city: String,
	/// ISO country code or name as accepted by the backend.
	pub country: String,
	/// Latitude, when pre-geocoded.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub latitude: Option<f64>,
	/// Longitude, when pre-geocoded.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub longitude: Option<f64>,
	/// IANA timezone override.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timezone: Option<String>,
}
impl VenueAddress {
	/// Creates an address with only the required fields set.
	pub fn new(
		address_line: impl Into<String>,
		city: impl Into<String>,
		country: impl Into<String>,
	) -> Self {
		Self {
			address_line: address_line.into(),
			city: city.into(),
			country: country.into(),
			latitude: None,
			longitude: None,
			timezone: None,
		}
	}
}

/// Payload for creating a venue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueCreate {
	/// Display name; must be unique within the tenant.
	pub name: String,
	/// Physical address.
	pub address: VenueAddress,
	/// Free-form description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Payload for updating a venue; absent members leave the backend value untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueUpdate {
	/// Replacement display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Replacement address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<VenueAddress>,
	/// Replacement description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Venue listing entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VenueSummary {
	/// Opaque venue identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// City, when the listing includes address detail.
	pub city: Option<String>,
	/// Country, when the listing includes address detail.
	pub country: Option<String>,
}

impl<T> Gateway<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists every venue in the tenant.
	pub async fn list_venues(&self) -> Result<Vec<VenueSummary>> {
		self.send(Method::Get, "/venues", None).await?.decode()
	}

	/// Creates a venue and resolves its completion.
	pub async fn create_venue(
		&self,
		venue: VenueCreate,
		poll: Option<PollSettings>,
	) -> Result<PollOutcome> {
		self.mutate(Mutation {
			kind: OpKind::Venue,
			stage: "create_venue",
			method: Method::Post,
			path: "/venues".into(),
			body: Some(encode_json(&venue)?),
			policy: POLICY,
			tracking: Tracking::Optional,
			poll,
		})
		.await
	}

	/// Updates a venue and resolves its completion.
	pub async fn update_venue(
		&self,
		venue_id: &str,
		update: VenueUpdate,
		poll: Option<PollSettings>,
	) -> Result<PollOutcome> {
		self.mutate(Mutation {
			kind: OpKind::Venue,
			stage: "update_venue",
			method: Method::Put,
			path: format!("/venues/{venue_id}"),
			body: Some(encode_json(&update)?),
			policy: POLICY,
			tracking: Tracking::Optional,
			poll,
		})
		.await
	}

	/// Deletes a venue and resolves its completion.
	pub async fn delete_venue(
		&self,
		venue_id: &str,
		poll: Option<PollSettings>,
	) -> Result<PollOutcome> {
		self.mutate(Mutation {
			kind: OpKind::Venue,
			stage: "delete_venue",
			method: Method::Delete,
			path: format!("/venues/{venue_id}"),
			body: None,
			policy: POLICY,
			tracking: Tracking::Optional,
			poll,
		})
		.await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn absent_optional_fields_are_omitted_from_payloads() {
		let venue = VenueCreate {
			name: "HQ".into(),
			address: VenueAddress::new("1 Main St", "Springfield", "US"),
			description: None,
		};
		let payload = serde_json::to_value(&venue).expect("Payload should serialize.");

		assert_eq!(
			payload,
			serde_json::json!({
				"name": "HQ",
				"address": { "addressLine": "1 Main St", "city": "Springfield", "country": "US" },
			})
		);
	}

	#[test]
	fn update_payloads_carry_only_the_changed_members() {
		let update = VenueUpdate { name: Some("HQ West".into()), ..Default::default() };
		let payload = serde_json::to_value(&update).expect("Payload should serialize.");

		assert_eq!(payload, serde_json::json!({ "name": "HQ West" }));
	}
}
