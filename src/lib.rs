//! Rust’s turnkey gateway to cloud-managed Wi-Fi estates—token-smart auth, async activity
//! tracking, and transport-aware observability in one crate built for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod activity;
pub mod auth;
pub mod backend;
pub mod cache;
pub mod error;
pub mod http;
pub mod obs;
pub mod ops;
pub mod rbac;
pub mod resolve;
pub mod token;
#[cfg(feature = "reqwest")]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; kept out of the way behind
	//! the underscore prefix rather than a feature so test binaries build without flags.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ClientAuthorization, ClientId, TenantId, TokenSecret},
		backend::BackendDescriptor,
		http::{InstantSleeper, ReqwestTransport},
		ops::Gateway,
	};

	/// Gateway type alias used by reqwest-backed integration tests.
	pub type ReqwestTestGateway = Gateway<ReqwestTransport>;

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Builds a [`ClientAuthorization`] fixture for the provided tenant/client pair.
	pub fn test_authorization(tenant: &str, client: &str, secret: &str) -> ClientAuthorization {
		let tenant = TenantId::new(tenant).expect("Tenant fixture should be valid.");
		let client = ClientId::new(client).expect("Client fixture should be valid.");

		ClientAuthorization::new(tenant, client, TokenSecret::new(secret))
	}

	/// Constructs a [`Gateway`] backed by the reqwest transport used across integration tests
	/// and an instant sleeper so poll loops finish without wall-clock delays.
	pub fn build_reqwest_test_gateway(
		descriptor: BackendDescriptor,
		authorization: ClientAuthorization,
	) -> ReqwestTestGateway {
		Gateway::with_transport(descriptor, authorization, test_reqwest_transport())
			.with_sleeper(Arc::new(InstantSleeper))
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeSet, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
