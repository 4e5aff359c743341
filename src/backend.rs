//! Backend descriptor data structures shared by every outbound call.
//!
//! A descriptor pins the base addresses for the management API and the credential
//! exchange endpoint. Regional deployments differ only in those bases, so the
//! [`Region`] presets cover the common case while the builder accepts fully custom
//! URLs for private or staged deployments.

// self
use crate::{_prelude::*, error::ConfigError};

/// Regional deployment locators for the managed backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
	/// North America (default deployment).
	#[default]
	NorthAmerica,
	/// Europe.
	Europe,
	/// Asia-Pacific.
	AsiaPacific,
}
impl Region {
	/// Returns the API base address for this region.
	pub const fn api_base(self) -> &'static str {
		match self {
			Region::NorthAmerica => "https://api.nms.cloud",
			Region::Europe => "https://api.eu.nms.cloud",
			Region::AsiaPacific => "https://api.asia.nms.cloud",
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Region::NorthAmerica => "na",
			Region::Europe => "eu",
			Region::AsiaPacific => "asia",
		}
	}
}
impl Display for Region {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable backend descriptor consumed by the token service and entity operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendDescriptor {
	/// Base address for management API calls.
	pub api: Url,
	/// Base address for the credential exchange endpoint.
	pub auth: Url,
}
impl BackendDescriptor {
	/// Creates a new builder.
	pub fn builder() -> BackendDescriptorBuilder {
		BackendDescriptorBuilder::default()
	}

	/// Builds the descriptor for a regional deployment.
	pub fn for_region(region: Region) -> Result<Self, ConfigError> {
		let base = Url::parse(region.api_base())
			.map_err(|source| ConfigError::InvalidDescriptor { source })?;

		Ok(Self { api: base.clone(), auth: base })
	}

	/// Joins a relative path onto the API base.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		self.api
			.join(path)
			.map_err(|source| ConfigError::InvalidEndpoint { path: path.to_owned(), source })
	}

	/// Returns the tenant-scoped credential exchange endpoint.
	pub fn token_endpoint(&self, tenant: &str) -> Result<Url, ConfigError> {
		let path = format!("/oauth2/token/{tenant}");

		self.auth
			.join(&path)
			.map_err(|source| ConfigError::InvalidEndpoint { path, source })
	}
}

/// Builder API for assembling backend descriptors.
#[derive(Clone, Debug, Default)]
pub struct BackendDescriptorBuilder {
	api: Option<Url>,
	auth: Option<Url>,
}
impl BackendDescriptorBuilder {
	/// Sets the management API base address.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api = Some(url);

		self
	}

	/// Sets the credential exchange base address.
	pub fn auth_base(mut self, url: Url) -> Self {
		self.auth = Some(url);

		self
	}

	/// Consumes the builder and produces a [`BackendDescriptor`].
	///
	/// When only one base is supplied the other defaults to it; when neither is supplied
	/// the default region's bases apply.
	pub fn build(self) -> Result<BackendDescriptor, ConfigError> {
		match (self.api, self.auth) {
			(Some(api), Some(auth)) => Ok(BackendDescriptor { api, auth }),
			(Some(base), None) | (None, Some(base)) =>
				Ok(BackendDescriptor { api: base.clone(), auth: base }),
			(None, None) => BackendDescriptor::for_region(Region::default()),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn region_presets_produce_distinct_bases() {
		let na = BackendDescriptor::for_region(Region::NorthAmerica)
			.expect("Default region descriptor should build.");
		let eu = BackendDescriptor::for_region(Region::Europe)
			.expect("Europe region descriptor should build.");

		assert_ne!(na.api, eu.api);
		assert_eq!(na.api, na.auth);
	}

	#[test]
	fn endpoint_joins_relative_paths() {
		let descriptor = BackendDescriptor::for_region(Region::NorthAmerica)
			.expect("Default region descriptor should build.");
		let url = descriptor.endpoint("/venues/abc/apGroups").expect("Join should succeed.");

		assert_eq!(url.as_str(), "https://api.nms.cloud/venues/abc/apGroups");
	}

	#[test]
	fn token_endpoint_is_tenant_scoped() {
		let descriptor = BackendDescriptor::for_region(Region::AsiaPacific)
			.expect("Asia region descriptor should build.");
		let url = descriptor.token_endpoint("tenant-7").expect("Join should succeed.");

		assert_eq!(url.as_str(), "https://api.asia.nms.cloud/oauth2/token/tenant-7");
	}

	#[test]
	fn builder_mirrors_a_single_base_across_both_endpoints() {
		let base = Url::parse("https://staging.nms.internal").expect("Base fixture should parse.");
		let descriptor = BackendDescriptor::builder()
			.api_base(base.clone())
			.build()
			.expect("Builder should accept a lone API base.");

		assert_eq!(descriptor.api, base);
		assert_eq!(descriptor.auth, base);
	}
}
