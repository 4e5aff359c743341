//! Credential acquisition with caching + singleflight guards.
//!
//! [`TokenService::bearer`] is the single entry point gating every outbound call: it
//! serves a cached credential when one remains outside the expiry safety margin, and
//! otherwise performs the client-credentials exchange against the backend token
//! endpoint. A per-key singleflight guard ensures concurrent callers piggy-back on the
//! same in-flight exchange instead of stampeding the endpoint; the guard is advisory
//! only, since exchanges are idempotent and a redundant refresh is harmless.

// self
use crate::{
	_prelude::*,
	auth::{ClientAuthorization, CredentialRecord, TokenKind, TokenSecret},
	backend::BackendDescriptor,
	cache::{CacheKey, CredentialCache},
	error::ConfigError,
	http::{ApiRequest, ApiResponse, ApiTransport, Method},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Exchanges long-lived client credentials for short-lived bearer credentials and owns
/// the cache that fronts the exchange.
pub struct TokenService<T>
where
	T: ?Sized + ApiTransport,
{
	transport: Arc<T>,
	descriptor: BackendDescriptor,
	cache: CredentialCache,
	exchange_guards: Arc<Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>>,
}
impl<T> TokenService<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a service that reuses the caller-provided transport.
	pub fn new(transport: impl Into<Arc<T>>, descriptor: BackendDescriptor) -> Self {
		Self {
			transport: transport.into(),
			descriptor,
			cache: CredentialCache::default(),
			exchange_guards: Default::default(),
		}
	}

	/// Replaces the backing cache, e.g. to share one cache across services.
	pub fn with_cache(mut self, cache: CredentialCache) -> Self {
		self.cache = cache;

		self
	}

	/// Returns the backing credential cache.
	pub fn cache(&self) -> &CredentialCache {
		&self.cache
	}

	/// Returns a bearer credential for the authorization, consulting the cache first.
	///
	/// On any exchange failure the cached credential for the pair is invalidated before
	/// the error propagates; a stale or rejected credential is never served again without
	/// a renewed exchange.
	pub async fn bearer(&self, authorization: &ClientAuthorization) -> Result<CredentialRecord> {
		const KIND: OpKind = OpKind::TokenExchange;

		let span = OpSpan::new(KIND, "bearer");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let key = CacheKey::new(&authorization.tenant, &authorization.client);
				let guard = self.exchange_guard(&key);
				let _singleflight = guard.lock().await;

				if let Some(record) =
					self.cache.get(&authorization.tenant, &authorization.client)
				{
					return Ok(record);
				}

				match self.exchange(authorization).await {
					Ok(record) => {
						self.cache.put(
							&authorization.tenant,
							&authorization.client,
							record.clone(),
						);

						Ok(record)
					},
					Err(err) => {
						self.cache.invalidate(&authorization.tenant, &authorization.client);

						Err(err)
					},
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	/// Performs the client-credentials exchange without touching the cache.
	///
	/// No retry happens here; retry policy belongs to the caller.
	pub async fn exchange(&self, authorization: &ClientAuthorization) -> Result<CredentialRecord> {
		let url = self.descriptor.token_endpoint(&authorization.tenant)?;
		let form = vec![
			("grant_type".into(), "client_credentials".into()),
			("client_id".into(), authorization.client.to_string()),
			("client_secret".into(), authorization.secret.expose().to_owned()),
		];
		let request = ApiRequest::new(Method::Post, url).with_form(form);
		let response = self.transport.execute(request).await.map_err(|err| {
			Error::Authentication { reason: err.to_string(), status: None }
		})?;

		if !response.is_success() {
			return Err(map_exchange_rejection(&response));
		}

		let payload = response.decode::<TokenEndpointResponse>()?;
		let expires_in = payload.expires_in.ok_or(ConfigError::MissingExpiresIn)?;

		if expires_in <= 0 {
			return Err(ConfigError::NonPositiveExpiresIn.into());
		}

		let kind = payload.token_type.as_deref().map(TokenKind::from_wire).unwrap_or_default();

		Ok(CredentialRecord::new(
			TokenSecret::new(payload.access_token),
			kind,
			OffsetDateTime::now_utc(),
			Duration::seconds(expires_in),
		))
	}

	fn exchange_guard(&self, key: &CacheKey) -> Arc<AsyncMutex<()>> {
		let mut guards = self.exchange_guards.lock();

		guards.entry(key.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
impl<T> Clone for TokenService<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			descriptor: self.descriptor.clone(),
			cache: self.cache.clone(),
			exchange_guards: self.exchange_guards.clone(),
		}
	}
}
impl<T> Debug for TokenService<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenService")
			.field("descriptor", &self.descriptor)
			.field("cache", &self.cache.stats())
			.finish()
	}
}

#[derive(Deserialize)]
struct TokenEndpointResponse {
	access_token: String,
	token_type: Option<String>,
	expires_in: Option<i64>,
}

fn map_exchange_rejection(response: &ApiResponse) -> Error {
	#[derive(Default, Deserialize)]
	struct ExchangeErrorBody {
		error: Option<String>,
		error_description: Option<String>,
	}

	let body = serde_json::from_slice::<ExchangeErrorBody>(&response.body).unwrap_or_default();
	let reason = body
		.error_description
		.or(body.error)
		.unwrap_or_else(|| "token endpoint returned a non-success status".into());

	Error::Authentication { reason, status: Some(response.status) }
}
