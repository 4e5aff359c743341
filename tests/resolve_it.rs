// crates.io
use httpmock::prelude::*;
// self
use nms_gateway::{_preludet::*, backend::BackendDescriptor, resolve::is_canonical_id};

const TENANT: &str = "tenant-resolve";
const CANONICAL: &str = "3f2c7a9e-1b4d-4c8a-9f3e-2d6b8a1c5e7f";

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
		test_authorization(TENANT, "client-resolve", "secret-resolve"),
	)
}

async fn mock_token(server: &MockServer) {
	server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/oauth2/token/{TENANT}"));
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"resolve-token\",\"token_type\":\"bearer\",\"expires_in\":3600}",
			);
		})
		.await;
}

#[tokio::test]
async fn canonical_identifiers_pass_through_without_a_listing_call() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);
	let listing = server
		.mock_async(|when, then| {
			when.method(GET).path("/venues");
			then.status(200).header("content-type", "application/json").body("[]");
		})
		.await;
	let ids = gateway
		.resolve_venue_ids(&[CANONICAL.to_owned()])
		.await
		.expect("Canonical inputs should resolve without the backend.");

	assert_eq!(ids, vec![CANONICAL.to_owned()]);

	listing.assert_calls_async(0).await;
}

#[tokio::test]
async fn mixed_inputs_resolve_names_by_exact_match() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);

	mock_token(&server).await;

	let listing = server
		.mock_async(|when, then| {
			when.method(GET).path("/venues");
			then.status(200).header("content-type", "application/json").body(
				"[{\"id\":\"venue-1\",\"name\":\"HQ\"},{\"id\":\"venue-2\",\"name\":\"Lab\"}]",
			);
		})
		.await;
	let ids = gateway
		.resolve_venue_ids(&["Lab".to_owned(), CANONICAL.to_owned()])
		.await
		.expect("Mixed inputs should resolve.");

	assert_eq!(ids, vec!["venue-2".to_owned(), CANONICAL.to_owned()]);

	listing.assert_async().await;
}

#[tokio::test]
async fn unknown_names_fail_with_every_available_name() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);

	mock_token(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/venues");
			then.status(200).header("content-type", "application/json").body(
				"[{\"id\":\"venue-1\",\"name\":\"HQ\"},{\"id\":\"venue-2\",\"name\":\"Lab\"}]",
			);
		})
		.await;

	let err = gateway
		.resolve_venue_ids(&["Warehouse".to_owned()])
		.await
		.expect_err("An unknown venue name must fail resolution.");

	match err {
		Error::NotFound(not_found) => {
			assert_eq!(not_found.kind, "venue");
			assert_eq!(not_found.name, "Warehouse");
			assert_eq!(not_found.available, vec!["HQ", "Lab"]);
		},
		other => panic!("Expected a not-found error, got {other:?}."),
	}
}

#[test]
fn exact_canonical_shape_is_required_for_pass_through() {
	assert!(is_canonical_id(CANONICAL));
	assert!(!is_canonical_id("HQ"));
	assert!(!is_canonical_id("3F2C7A9E1B4D4C8A9F3E2D6B8A1C5E7F"));
}
