//! Access point operations.
//!
//! Moving an AP between venues is always asynchronous on the backend, so the move
//! demands a tracking identifier; a response without one is a protocol error rather
//! than a silent success.

// self
use crate::{
	_prelude::*,
	activity::{PollOutcome, PollSettings, StatusPolicy},
	http::{ApiTransport, Method, encode_json},
	obs::OpKind,
	ops::{Gateway, Mutation, Tracking},
};

const POLICY: StatusPolicy = StatusPolicy::EndDatetimeGated;

/// Requested AP placement; the venue may be given by name or opaque identifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApMove {
	/// Serial number of the AP to move.
	pub serial_number: String,
	/// Target venue, by display name or identifier.
	pub venue: String,
	/// Target AP group inside the venue, when not the venue default.
	pub ap_group_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApMovePayload {
	venue_id: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	ap_group_id: Option<String>,
}

/// AP listing entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApSummary {
	/// AP serial number.
	pub serial_number: String,
	/// Display name, when assigned.
	pub name: Option<String>,
	/// Owning venue identifier, when adopted.
	pub venue_id: Option<String>,
	/// Owning AP group identifier, when adopted.
	pub ap_group_id: Option<String>,
	/// Hardware model.
	pub model: Option<String>,
}

impl<T> Gateway<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists every AP in the tenant.
	pub async fn list_aps(&self) -> Result<Vec<ApSummary>> {
		self.send(Method::Get, "/aps", None).await?.decode()
	}

	/// Moves an AP into a venue (and optionally a specific AP group), resolving the
	/// venue by name first when needed.
	pub async fn move_ap(&self, request: ApMove, poll: Option<PollSettings>) -> Result<PollOutcome> {
		let mut resolved = self.resolve_venue_ids(std::slice::from_ref(&request.venue)).await?;
		let venue_id = resolved.pop().unwrap_or(request.venue);
		let payload = ApMovePayload { venue_id, ap_group_id: request.ap_group_id };

		self.mutate(Mutation {
			kind: OpKind::AccessPoint,
			stage: "move_ap",
			method: Method::Put,
			path: format!("/aps/{}", request.serial_number),
			body: Some(encode_json(&payload)?),
			policy: POLICY,
			tracking: Tracking::Required,
			poll,
		})
		.await
	}
}
