//! Short-lived bearer credential records and the redacting secret wrapper.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Token kind tag reported by the exchange endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
	/// RFC 6750 bearer token.
	#[default]
	Bearer,
	/// Any other kind reported on the wire, preserved verbatim.
	Other(String),
}
impl TokenKind {
	/// Parses the wire `token_type` value, treating any casing of `bearer` as bearer.
	pub fn from_wire(value: &str) -> Self {
		if value.eq_ignore_ascii_case("bearer") { Self::Bearer } else { Self::Other(value.to_owned()) }
	}
}

/// Long-lived client credentials exchanged for short-lived bearer credentials.
#[derive(Clone)]
pub struct ClientAuthorization {
	/// Tenant identifier tied to the exchange.
	pub tenant: super::TenantId,
	/// Client identifier registered with the backend.
	pub client: super::ClientId,
	/// Client secret; never logged.
	pub secret: TokenSecret,
}
impl ClientAuthorization {
	/// Creates a new authorization for the provided tenant/client pair.
	pub fn new(tenant: super::TenantId, client: super::ClientId, secret: TokenSecret) -> Self {
		Self { tenant, client, secret }
	}
}
impl Debug for ClientAuthorization {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientAuthorization")
			.field("tenant", &self.tenant)
			.field("client", &self.client)
			.field("secret", &"<redacted>")
			.finish()
	}
}

/// Short-lived bearer credential cached between outbound calls.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
	/// Bearer secret; callers must avoid logging it.
	pub token: TokenSecret,
	/// Token kind tag from the exchange response.
	pub kind: TokenKind,
	/// Instant the credential was issued.
	pub issued_at: OffsetDateTime,
	/// Absolute expiry instant derived from `issued_at` plus the reported lifetime.
	pub expires_at: OffsetDateTime,
}
impl CredentialRecord {
	/// Safety margin within which a credential is never served from cache.
	pub const EXPIRY_SAFETY_MARGIN: Duration = Duration::seconds(60);

	/// Creates a record expiring `ttl` after `issued_at`.
	pub fn new(token: TokenSecret, kind: TokenKind, issued_at: OffsetDateTime, ttl: Duration) -> Self {
		Self { token, kind, issued_at, expires_at: issued_at + ttl }
	}

	/// Returns `true` while the record stays outside the expiry safety margin.
	pub fn is_fresh_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at - Self::EXPIRY_SAFETY_MARGIN
	}

	/// Convenience helper that checks freshness against the current UTC instant.
	pub fn is_fresh(&self) -> bool {
		self.is_fresh_at(OffsetDateTime::now_utc())
	}
}
impl Debug for CredentialRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialRecord")
			.field("token", &"<redacted>")
			.field("kind", &self.kind)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
