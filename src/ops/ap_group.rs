//! AP group operations, scoped to a venue.
//!
//! AP group mutations share the timestamp-gated activity vocabulary with venues.

// self
use crate::{
	_prelude::*,
	activity::{PollOutcome, PollSettings, StatusPolicy},
	http::{ApiTransport, Method, encode_json},
	obs::OpKind,
	ops::{Gateway, Mutation, Tracking},
};

const POLICY: StatusPolicy = StatusPolicy::EndDatetimeGated;

/// Payload for creating an AP group inside a venue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApGroupCreate {
	/// Display name; must be unique within the venue.
	pub name: String,
	/// Free-form description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Serial numbers of APs to adopt into the group on creation.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ap_serial_numbers: Option<Vec<String>>,
}

/// Payload for updating an AP group; absent members leave the backend value untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApGroupUpdate {
	/// Replacement display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Replacement description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// AP group listing entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApGroupSummary {
	/// Opaque AP group identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Owning venue identifier.
	pub venue_id: Option<String>,
	/// Number of APs currently in the group.
	pub ap_count: Option<u32>,
}

impl<T> Gateway<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists the AP groups of a venue.
	pub async fn list_ap_groups(&self, venue_id: &str) -> Result<Vec<ApGroupSummary>> {
		self.send(Method::Get, &format!("/venues/{venue_id}/apGroups"), None).await?.decode()
	}

	/// Creates an AP group and resolves its completion.
	pub async fn create_ap_group(
		&self,
		venue_id: &str,
		group: ApGroupCreate,
		poll: Option<PollSettings>,
	) -> Result<PollOutcome> {
		self.mutate(Mutation {
			kind: OpKind::ApGroup,
			stage: "create_ap_group",
			method: Method::Post,
			path: format!("/venues/{venue_id}/apGroups"),
			body: Some(encode_json(&group)?),
			policy: POLICY,
			tracking: Tracking::Optional,
			poll,
		})
		.await
	}

	/// Updates an AP group and resolves its completion.
	pub async fn update_ap_group(
		&self,
		venue_id: &str,
		group_id: &str,
		update: ApGroupUpdate,
		poll: Option<PollSettings>,
	) -> Result<PollOutcome> {
		self.mutate(Mutation {
			kind: OpKind::ApGroup,
			stage: "update_ap_group",
			method: Method::Put,
			path: format!("/venues/{venue_id}/apGroups/{group_id}"),
			body: Some(encode_json(&update)?),
			policy: POLICY,
			tracking: Tracking::Optional,
			poll,
		})
		.await
	}

	/// Deletes an AP group and resolves its completion.
	pub async fn delete_ap_group(
		&self,
		venue_id: &str,
		group_id: &str,
		poll: Option<PollSettings>,
	) -> Result<PollOutcome> {
		self.mutate(Mutation {
			kind: OpKind::ApGroup,
			stage: "delete_ap_group",
			method: Method::Delete,
			path: format!("/venues/{venue_id}/apGroups/{group_id}"),
			body: None,
			policy: POLICY,
			tracking: Tracking::Optional,
			poll,
		})
		.await
	}
}
