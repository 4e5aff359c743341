//! Directory-server profile operations.
//!
//! The identity subsystem reports completion through the explicit
//! `COMPLETED`/`FAILED` vocabulary and never sets a completion timestamp, so every
//! mutating call here polls with [`StatusPolicy::StatusGated`].

// self
use crate::{
	_prelude::*,
	activity::{PollOutcome, PollSettings, StatusPolicy},
	http::{ApiTransport, Method, encode_json},
	obs::OpKind,
	ops::{Gateway, Mutation, Tracking},
};

const POLICY: StatusPolicy = StatusPolicy::StatusGated;

/// Attribute mapping between directory entries and backend identities.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryAttributeMapping {
	/// Directory attribute holding the login name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_name: Option<String>,
	/// Directory attribute holding the display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	/// Directory attribute holding the mail address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
}

/// Payload for creating a directory-server profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryProfileCreate {
	/// Display name; must be unique within the tenant.
	pub name: String,
	/// Directory server host.
	pub host: String,
	/// Directory server port.
	pub port: u16,
	/// Whether to wrap the connection in TLS.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tls_enabled: Option<bool>,
	/// Search base domain.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub base_domain: Option<String>,
	/// Bind domain for the admin account.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub admin_domain: Option<String>,
	/// Bind password for the admin account.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub admin_password: Option<String>,
	/// Attribute mapping overrides.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub attribute_mapping: Option<DirectoryAttributeMapping>,
}

/// Payload for updating a profile; absent members leave the backend value untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryProfileUpdate {
	/// Replacement display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Replacement host.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub host: Option<String>,
	/// Replacement port.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub port: Option<u16>,
	/// Replacement TLS toggle.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tls_enabled: Option<bool>,
	/// Replacement search base domain.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub base_domain: Option<String>,
	/// Replacement attribute mapping.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub attribute_mapping: Option<DirectoryAttributeMapping>,
}

/// Directory-server profile listing entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DirectoryProfileSummary {
	/// Opaque profile identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Directory server host.
	pub host: Option<String>,
	/// Directory server port.
	pub port: Option<u16>,
}

impl<T> Gateway<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists every directory-server profile in the tenant.
	pub async fn list_directory_profiles(&self) -> Result<Vec<DirectoryProfileSummary>> {
		self.send(Method::Get, "/directoryServerProfiles", None).await?.decode()
	}

	/// Creates a directory-server profile and resolves its completion.
	pub async fn create_directory_profile(
		&self,
		profile: DirectoryProfileCreate,
		poll: Option<PollSettings>,
	) -> Result<PollOutcome> {
		self.mutate(Mutation {
			kind: OpKind::DirectoryProfile,
			stage: "create_directory_profile",
			method: Method::Post,
			path: "/directoryServerProfiles".into(),
			body: Some(encode_json(&profile)?),
			policy: POLICY,
			tracking: Tracking::Optional,
			poll,
		})
		.await
	}

	/// Updates a directory-server profile and resolves its completion.
	pub async fn update_directory_profile(
		&self,
		profile_id: &str,
		update: DirectoryProfileUpdate,
		poll: Option<PollSettings>,
	) -> Result<PollOutcome> {
		self.mutate(Mutation {
			kind: OpKind::DirectoryProfile,
			stage: "update_directory_profile",
			method: Method::Put,
			path: format!("/directoryServerProfiles/{profile_id}"),
			body: Some(encode_json(&update)?),
			policy: POLICY,
			tracking: Tracking::Optional,
			poll,
		})
		.await
	}

	/// Deletes a directory-server profile and resolves its completion.
	pub async fn delete_directory_profile(
		&self,
		profile_id: &str,
		poll: Option<PollSettings>,
	) -> Result<PollOutcome> {
		self.mutate(Mutation {
			kind: OpKind::DirectoryProfile,
			stage: "delete_directory_profile",
			method: Method::Delete,
			path: format!("/directoryServerProfiles/{profile_id}"),
			body: None,
			policy: POLICY,
			tracking: Tracking::Optional,
			poll,
		})
		.await
	}
}
