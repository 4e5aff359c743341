// crates.io
use httpmock::prelude::*;
// self
use nms_gateway::{
	_preludet::*,
	auth::CredentialRecord,
	backend::BackendDescriptor,
};

const TENANT: &str = "tenant-token";
const CLIENT: &str = "client-token";
const SECRET: &str = "secret-token";

fn build_descriptor(server: &MockServer) -> BackendDescriptor {
	let base = Url::parse(&server.base_url()).expect("Mock server base URL should parse.");

	BackendDescriptor::builder()
		.api_base(base)
		.build()
		.expect("Backend descriptor should build successfully.")
}

fn build_gateway(server: &MockServer) -> ReqwestTestGateway {
	build_reqwest_test_gateway(
		build_descriptor(server),
		test_authorization(TENANT, CLIENT, SECRET),
	)
}

#[tokio::test]
async fn bearer_caches_credential_after_success() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/oauth2/token/{TENANT}"));
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"cached-token\",\"token_type\":\"bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let first: CredentialRecord =
		gateway.tokens.bearer(&gateway.authorization).await.expect("First bearer should succeed.");
	let second = gateway
		.tokens
		.bearer(&gateway.authorization)
		.await
		.expect("Cached bearer should succeed.");

	assert_eq!(first.token.expose(), "cached-token");
	assert_eq!(second.token.expose(), "cached-token");

	mock.assert_calls_async(1).await;

	let stats = gateway.cache().stats();

	assert_eq!(stats.count, 1);
	assert_eq!(stats.keys, vec![format!("{TENANT}/{CLIENT}")]);
}

#[tokio::test]
async fn bearer_singleflight_exchanges_once() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/oauth2/token/{TENANT}"));
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"guard-token\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let (first, second) = tokio::join!(
		gateway.tokens.bearer(&gateway.authorization),
		gateway.tokens.bearer(&gateway.authorization),
	);
	let first = first.expect("First concurrent bearer should succeed.");
	let second = second.expect("Second concurrent bearer should succeed.");

	assert_eq!(first.token.expose(), "guard-token");
	assert_eq!(second.token.expose(), "guard-token");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn short_lived_credentials_are_never_served_from_cache() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);
	// A 60 second lifetime sits entirely inside the expiry safety margin, so every
	// bearer call must perform a fresh exchange.
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/oauth2/token/{TENANT}"));
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"ephemeral-token\",\"token_type\":\"bearer\",\"expires_in\":60}",
			);
		})
		.await;

	gateway
		.tokens
		.bearer(&gateway.authorization)
		.await
		.expect("First bearer should succeed.");
	gateway
		.tokens
		.bearer(&gateway.authorization)
		.await
		.expect("Second bearer should succeed.");

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn rejected_exchange_surfaces_auth_error_and_clears_the_cache() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);
	let mut success = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/oauth2/token/{TENANT}"));
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"doomed-token\",\"token_type\":\"bearer\",\"expires_in\":60}",
			);
		})
		.await;

	gateway
		.tokens
		.bearer(&gateway.authorization)
		.await
		.expect("Priming bearer should succeed.");
	success.delete_async().await;

	let rejection = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/oauth2/token/{TENANT}"));
			then.status(401).header("content-type", "application/json").body(
				"{\"error\":\"invalid_client\",\"error_description\":\"Client disabled\"}",
			);
		})
		.await;
	let err = gateway
		.tokens
		.bearer(&gateway.authorization)
		.await
		.expect_err("A rejected exchange must surface to the caller.");

	match err {
		Error::Authentication { reason, status } => {
			assert_eq!(reason, "Client disabled");
			assert_eq!(status, Some(401));
		},
		other => panic!("Expected an authentication error, got {other:?}."),
	}

	rejection.assert_async().await;

	assert_eq!(gateway.cache().stats().count, 0, "Rejection must leave no cached credential.");
}

#[tokio::test]
async fn exchange_without_expires_in_is_a_config_error() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);

	server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/oauth2/token/{TENANT}"));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"no-expiry\",\"token_type\":\"bearer\"}");
		})
		.await;

	let err = gateway
		.tokens
		.bearer(&gateway.authorization)
		.await
		.expect_err("A response without expires_in must be rejected.");

	assert!(matches!(err, Error::Config(_)));
}
