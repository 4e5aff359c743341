//! Thread-safe in-memory credential cache keyed by tenant/client pairs.
//!
//! Expiry is checked lazily on read; there is no background eviction thread. The cache
//! holds at most one entry per tenant/client pair and reads happen at most once per
//! outbound call, so lazy eviction keeps the structure small without a sweeper.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, CredentialRecord, TenantId},
};

type CacheMap = Arc<RwLock<HashMap<CacheKey, CredentialRecord>>>;

/// Unique key identifying a cached credential.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
	/// Tenant component.
	pub tenant: TenantId,
	/// Client component.
	pub client: ClientId,
}
impl CacheKey {
	/// Builds a key for the provided tenant/client pair.
	pub fn new(tenant: &TenantId, client: &ClientId) -> Self {
		Self { tenant: tenant.clone(), client: client.clone() }
	}
}
impl Display for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}/{}", self.tenant, self.client)
	}
}

/// Point-in-time cache summary for diagnostics surfaces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
	/// Number of live entries.
	pub count: usize,
	/// Rendered `tenant/client` keys of the live entries.
	pub keys: Vec<String>,
}

/// Thread-safe store for short-lived bearer credentials.
#[derive(Clone, Debug, Default)]
pub struct CredentialCache(CacheMap);
impl CredentialCache {
	/// Returns the cached credential for the pair, or `None` when absent or within the
	/// expiry safety margin. Stale entries are evicted as a side effect of the read.
	pub fn get(&self, tenant: &TenantId, client: &ClientId) -> Option<CredentialRecord> {
		self.get_at(tenant, client, OffsetDateTime::now_utc())
	}

	/// Freshness-checked read against an explicit instant.
	pub fn get_at(
		&self,
		tenant: &TenantId,
		client: &ClientId,
		now: OffsetDateTime,
	) -> Option<CredentialRecord> {
		let key = CacheKey::new(tenant, client);
		let mut guard = self.0.write();
		let record = guard.get(&key)?;

		if record.is_fresh_at(now) {
			return Some(record.clone());
		}

		guard.remove(&key);

		None
	}

	/// Stores a credential, overwriting any existing entry for the pair.
	pub fn put(&self, tenant: &TenantId, client: &ClientId, record: CredentialRecord) {
		self.0.write().insert(CacheKey::new(tenant, client), record);
	}

	/// Removes the entry for the pair, returning it when one existed.
	pub fn invalidate(&self, tenant: &TenantId, client: &ClientId) -> Option<CredentialRecord> {
		self.0.write().remove(&CacheKey::new(tenant, client))
	}

	/// Removes every entry.
	pub fn clear(&self) {
		self.0.write().clear();
	}

	/// Returns the live entry count and rendered keys.
	pub fn stats(&self) -> CacheStats {
		let guard = self.0.read();
		let mut keys: Vec<String> = guard.keys().map(CacheKey::to_string).collect();

		keys.sort();

		CacheStats { count: guard.len(), keys }
	}
}
