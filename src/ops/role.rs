//! Administrator role operations.
//!
//! Role creation composes the privilege-group resolver and the permission augmenter
//! before touching the backend: the requested feature list is widened with implied
//! parent read grants, and the target privilege group may be given by name. Role
//! mutations use the explicit `COMPLETED`/`FAILED` activity vocabulary.

// self
use crate::{
	_prelude::*,
	activity::{PollOutcome, PollSettings, StatusPolicy},
	http::{ApiTransport, Method, encode_json},
	obs::OpKind,
	ops::{Gateway, Mutation, Tracking},
	rbac,
};

const POLICY: StatusPolicy = StatusPolicy::StatusGated;

/// Payload for creating a custom administrator role.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCreate {
	/// Display name; must be unique within the tenant.
	pub name: String,
	/// Requested permission feature tokens; implied parent grants are injected before
	/// submission.
	pub features: Vec<String>,
	/// Target privilege group, by display name or identifier.
	pub privilege_group: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleCreatePayload {
	name: String,
	features: Vec<String>,
	privilege_group_id: String,
}

/// Result of a role creation, pairing the poll outcome with the submitted grants.
#[derive(Debug)]
pub struct RoleCreated {
	/// Terminal poll outcome of the creation.
	pub outcome: PollOutcome,
	/// Full feature list as submitted, including injected grants.
	pub features: Vec<String>,
	/// Only the grants injected by augmentation.
	pub added_features: Vec<String>,
}

/// Role listing entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoleSummary {
	/// Opaque role identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Owning privilege group identifier.
	pub privilege_group_id: Option<String>,
}

/// Privilege group listing entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrivilegeGroupSummary {
	/// Opaque privilege group identifier.
	pub id: String,
	/// Display name.
	pub name: String,
}

impl<T> Gateway<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists every administrator role in the tenant.
	pub async fn list_roles(&self) -> Result<Vec<RoleSummary>> {
		self.send(Method::Get, "/roles", None).await?.decode()
	}

	/// Lists every privilege group in the tenant.
	pub async fn list_privilege_groups(&self) -> Result<Vec<PrivilegeGroupSummary>> {
		self.send(Method::Get, "/privilegeGroups", None).await?.decode()
	}

	/// Creates a role with augmented permissions and resolves its completion.
	pub async fn create_role(
		&self,
		role: RoleCreate,
		poll: Option<PollSettings>,
	) -> Result<RoleCreated> {
		let privilege_group_id = self.resolve_privilege_group_id(&role.privilege_group).await?;
		let augmentation = rbac::augment(&role.features);
		let payload = RoleCreatePayload {
			name: role.name,
			features: augmentation.final_features.clone(),
			privilege_group_id,
		};
		let outcome = self
			.mutate(Mutation {
				kind: OpKind::AdminRole,
				stage: "create_role",
				method: Method::Post,
				path: "/roles".into(),
				body: Some(encode_json(&payload)?),
				policy: POLICY,
				tracking: Tracking::Optional,
				poll,
			})
			.await?;

		Ok(RoleCreated {
			outcome,
			features: augmentation.final_features,
			added_features: augmentation.added,
		})
	}

	/// Deletes a role and resolves its completion.
	pub async fn delete_role(
		&self,
		role_id: &str,
		poll: Option<PollSettings>,
	) -> Result<PollOutcome> {
		self.mutate(Mutation {
			kind: OpKind::AdminRole,
			stage: "delete_role",
			method: Method::Delete,
			path: format!("/roles/{role_id}"),
			body: None,
			policy: POLICY,
			tracking: Tracking::Optional,
			poll,
		})
		.await
	}
}
