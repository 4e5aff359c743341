//! High-level entity operations powered by the gateway.

pub mod ap;
pub mod ap_group;
pub mod profile;
pub mod role;
pub mod venue;

pub use ap::*;
pub use ap_group::*;
pub use profile::*;
pub use role::*;
pub use venue::*;

// self
use crate::{
	_prelude::*,
	activity::{ActivityProber, PollOutcome, PollSettings, Poller, StatusPolicy},
	auth::{ClientAuthorization, CredentialRecord},
	backend::BackendDescriptor,
	cache::CredentialCache,
	error::ApiError,
	http::{self, ApiRequest, ApiResponse, ApiTransport, Method, Sleeper},
	obs::{self, OpKind, OpOutcome, OpSpan},
	token::TokenService,
};
#[cfg(feature = "reqwest")]
use crate::http::{ReqwestTransport, TokioSleeper};
#[cfg(not(feature = "reqwest"))] use crate::http::InstantSleeper;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport stack.
pub type ReqwestGateway = Gateway<ReqwestTransport>;

/// Tracking expectations for a mutating operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tracking {
	/// The backend may answer synchronously; a missing identifier means done.
	Optional,
	/// The operation is documented to always be asynchronous; a missing identifier is a
	/// protocol error.
	Required,
}

/// Receipt parsed from a mutating response; only the tracking identifier matters here.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MutationReceipt {
	/// Tracking identifier of the asynchronous backend operation, when one was started.
	pub request_id: Option<String>,
}

/// Fully shaped mutating call handed to the shared plumbing.
#[derive(Clone, Debug)]
pub(crate) struct Mutation {
	pub kind: OpKind,
	pub stage: &'static str,
	pub method: Method,
	pub path: String,
	pub body: Option<serde_json::Value>,
	pub policy: StatusPolicy,
	pub tracking: Tracking,
	pub poll: Option<PollSettings>,
}

/// Coordinates entity operations against a single backend deployment.
///
/// The gateway owns the transport, token service, backend descriptor, and poll
/// defaults so individual operations can focus on request shaping. One gateway serves
/// one tenant/client authorization; construct several to fan out across tenants, and
/// share a [`CredentialCache`] between them via [`TokenService::with_cache`].
pub struct Gateway<T>
where
	T: ?Sized + ApiTransport,
{
	/// Transport used for every outbound backend request.
	pub transport: Arc<T>,
	/// Backend descriptor defining API and auth base addresses.
	pub descriptor: BackendDescriptor,
	/// Token service gating every call.
	pub tokens: TokenService<T>,
	/// Long-lived client credentials for this gateway.
	pub authorization: ClientAuthorization,
	/// Sleeper injected into poll loops.
	pub sleeper: Arc<dyn Sleeper>,
	/// Poll budget and cadence applied when a call site passes no override.
	pub poll_defaults: PollSettings,
}
impl<T> Gateway<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a gateway that reuses the caller-provided transport.
	///
	/// With the `reqwest` feature the poller suspends on the tokio timer; without it an
	/// instant sleeper is installed and embedders should supply their runtime's sleeper
	/// via [`Gateway::with_sleeper`].
	pub fn with_transport(
		descriptor: BackendDescriptor,
		authorization: ClientAuthorization,
		transport: impl Into<Arc<T>>,
	) -> Self {
		let transport = transport.into();
		#[cfg(feature = "reqwest")]
		let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
		#[cfg(not(feature = "reqwest"))]
		let sleeper: Arc<dyn Sleeper> = Arc::new(InstantSleeper);

		Self {
			tokens: TokenService::new(transport.clone(), descriptor.clone()),
			transport,
			descriptor,
			authorization,
			sleeper,
			poll_defaults: PollSettings::default(),
		}
	}

	/// Replaces the sleeper used between poll attempts.
	pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
		self.sleeper = sleeper;

		self
	}

	/// Replaces the default poll settings.
	pub fn with_poll_defaults(mut self, settings: PollSettings) -> Self {
		self.poll_defaults = settings;

		self
	}

	/// Replaces the token service, e.g. to share a credential cache across gateways.
	pub fn with_token_service(mut self, tokens: TokenService<T>) -> Self {
		self.tokens = tokens;

		self
	}

	/// Returns the credential cache backing this gateway.
	pub fn cache(&self) -> &CredentialCache {
		self.tokens.cache()
	}

	/// Builds a poller wired to this gateway's transport, descriptor, and sleeper.
	pub fn poller(&self) -> Poller<T> {
		Poller::new(
			ActivityProber::new(self.transport.clone(), self.descriptor.clone()),
			self.sleeper.clone(),
		)
	}

	/// Returns a bearer credential for this gateway's authorization.
	pub(crate) async fn bearer(&self) -> Result<CredentialRecord> {
		self.tokens.bearer(&self.authorization).await
	}

	/// Issues one authenticated request and enforces the 2xx contract.
	pub(crate) async fn send(
		&self,
		method: Method,
		path: &str,
		body: Option<serde_json::Value>,
	) -> Result<ApiResponse> {
		let credential = self.bearer().await?;

		self.send_with(&credential, method, path, body).await
	}

	pub(crate) async fn send_with(
		&self,
		credential: &CredentialRecord,
		method: Method,
		path: &str,
		body: Option<serde_json::Value>,
	) -> Result<ApiResponse> {
		let url = self.descriptor.endpoint(path)?;
		let mut request = ApiRequest::new(method, url).with_bearer(credential.token.clone());

		if let Some(body) = body {
			request = request.with_json(body);
		}

		let response = self.transport.execute(request).await?;

		if !response.is_success() {
			return Err(ApiError::from_response(response.status, response.body_text()).into());
		}

		Ok(response)
	}

	/// Shared mutation plumbing: request, receipt, poll.
	pub(crate) async fn mutate(&self, mutation: Mutation) -> Result<PollOutcome> {
		let Mutation { kind, stage, method, path, body, policy, tracking, poll } = mutation;
		let span = OpSpan::new(kind, stage);

		obs::record_op_outcome(kind, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let credential = self.bearer().await?;
				let response = self.send_with(&credential, method, &path, body).await?;
				let receipt = decode_receipt(&response)?;
				let settings = poll.unwrap_or(self.poll_defaults);
				let poller = self.poller();

				match tracking {
					Tracking::Optional => Ok(poller
						.track(&credential, receipt.request_id.as_deref(), policy, settings)
						.await),
					Tracking::Required =>
						poller
							.track_required(
								&credential,
								receipt.request_id.as_deref(),
								stage,
								policy,
								settings,
							)
							.await,
				}
			})
			.await;

		match &result {
			Ok(outcome) if outcome.is_completed() =>
				obs::record_op_outcome(kind, OpOutcome::Success),
			_ => obs::record_op_outcome(kind, OpOutcome::Failure),
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestTransport> {
	/// Creates a new gateway for the provided descriptor and authorization.
	///
	/// The gateway provisions its own reqwest-backed transport so callers do not need
	/// to pass HTTP handles explicitly.
	pub fn new(descriptor: BackendDescriptor, authorization: ClientAuthorization) -> Self {
		Self::with_transport(descriptor, authorization, ReqwestTransport::default())
	}
}
impl<T> Clone for Gateway<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			descriptor: self.descriptor.clone(),
			tokens: self.tokens.clone(),
			authorization: self.authorization.clone(),
			sleeper: self.sleeper.clone(),
			poll_defaults: self.poll_defaults,
		}
	}
}
impl<T> Debug for Gateway<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("descriptor", &self.descriptor)
			.field("authorization", &self.authorization)
			.field("poll_defaults", &self.poll_defaults)
			.finish()
	}
}

fn decode_receipt(response: &ApiResponse) -> Result<MutationReceipt> {
	if response.body.is_empty() {
		return Ok(MutationReceipt::default());
	}

	http::decode_json(&response.body)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn receipt_parsing_handles_empty_and_tracked_bodies() {
		let empty = decode_receipt(&ApiResponse { status: 204, body: Vec::new() })
			.expect("An empty body should decode to an empty receipt.");

		assert_eq!(empty.request_id, None);

		let tracked = decode_receipt(&ApiResponse {
			status: 202,
			body: b"{\"requestId\":\"req-9\",\"status\":\"PENDING\"}".to_vec(),
		})
		.expect("A tracked body should decode.");

		assert_eq!(tracked.request_id.as_deref(), Some("req-9"));
	}
}
