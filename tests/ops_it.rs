// crates.io
use httpmock::prelude::*;
// self
use nms_gateway::{
	_preludet::*,
	activity::PollSettings,
	backend::BackendDescriptor,
	error::ApiError,
	ops::{ApMove, DirectoryProfileCreate, VenueAddress, VenueCreate},
};

const TENANT: &str = "tenant-ops";

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
		test_authorization(TENANT, "client-ops", "secret-ops"),
	)
}

async fn mock_token(server: &MockServer) {
	server
		.mock_async(|when, then| {
			when.method(POST).path(format!("/oauth2/token/{TENANT}"));
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"ops-token\",\"token_type\":\"bearer\",\"expires_in\":3600}",
			);
		})
		.await;
}

#[tokio::test]
async fn create_venue_polls_the_activity_to_completion() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);

	mock_token(&server).await;

	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/venues");
			then.status(202)
				.header("content-type", "application/json")
				.body("{\"requestId\":\"req-venue-1\",\"id\":\"venue-1\"}");
		})
		.await;
	let activity = server
		.mock_async(|when, then| {
			when.method(GET).path("/activities/req-venue-1");
			then.status(200).header("content-type", "application/json").body(
				"{\"status\":\"SUCCESS\",\"endDatetime\":\"2025-06-01T12:00:00Z\"}",
			);
		})
		.await;
	let venue = VenueCreate {
		name: "HQ".into(),
		address: VenueAddress::new("1 Main St", "Springfield", "US"),
		description: Some("Head office".into()),
	};
	let outcome = gateway
		.create_venue(venue, None)
		.await
		.expect("Venue creation should succeed end to end.");

	assert!(outcome.is_completed());
	assert_eq!(outcome.message(), "Operation completed successfully.");

	create.assert_async().await;
	activity.assert_async().await;
}

#[tokio::test]
async fn synchronous_delete_skips_polling_entirely() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);

	mock_token(&server).await;

	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/venues/venue-9");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let activity = server
		.mock_async(|when, then| {
			when.method(GET).path_includes("/activities/");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"status\":\"SUCCESS\",\"endDatetime\":\"t\"}");
		})
		.await;
	let outcome = gateway
		.delete_venue("venue-9", None)
		.await
		.expect("Synchronous deletion should succeed.");

	assert!(outcome.is_completed());
	assert_eq!(outcome.message(), "Operation completed synchronously.");
	assert!(outcome.last_record().is_none());

	delete.assert_async().await;
	activity.assert_calls_async(0).await;
}

#[tokio::test]
async fn profile_creation_times_out_after_the_overridden_budget() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);

	mock_token(&server).await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/directoryServerProfiles");
			then.status(202)
				.header("content-type", "application/json")
				.body("{\"requestId\":\"req-profile-1\"}");
		})
		.await;

	let activity = server
		.mock_async(|when, then| {
			when.method(GET).path("/activities/req-profile-1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"status\":\"PENDING\"}");
		})
		.await;
	let profile = DirectoryProfileCreate {
		name: "Corp LDAP".into(),
		host: "ldap.corp.example".into(),
		port: 636,
		tls_enabled: Some(true),
		base_domain: Some("dc=corp,dc=example".into()),
		admin_domain: None,
		admin_password: None,
		attribute_mapping: None,
	};
	let outcome = gateway
		.create_directory_profile(
			profile,
			Some(PollSettings::default().with_max_attempts(3)),
		)
		.await
		.expect("The mutation itself should succeed even when polling times out.");

	assert!(outcome.is_timed_out());
	assert!(outcome.message().contains("polling budget was exhausted"));

	activity.assert_calls_async(3).await;
}

#[tokio::test]
async fn backend_rejections_carry_parsed_error_fields() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);

	mock_token(&server).await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/venues");
			then.status(400).header("content-type", "application/json").body(
				"{\"code\":\"DUPLICATE_NAME\",\"message\":\"Venue name already in use\"}",
			);
		})
		.await;

	let venue = VenueCreate {
		name: "HQ".into(),
		address: VenueAddress::new("1 Main St", "Springfield", "US"),
		description: None,
	};
	let err = gateway
		.create_venue(venue, None)
		.await
		.expect_err("A 400 from the backend must propagate.");

	match err {
		Error::Api(ApiError { status, code, message, .. }) => {
			assert_eq!(status, 400);
			assert_eq!(code.as_deref(), Some("DUPLICATE_NAME"));
			assert_eq!(message.as_deref(), Some("Venue name already in use"));
		},
		other => panic!("Expected an API error, got {other:?}."),
	}
}

#[tokio::test]
async fn ap_move_without_a_tracking_identifier_is_a_protocol_error() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);

	mock_token(&server).await;

	let move_mock = server
		.mock_async(|when, then| {
			when.method(PUT).path("/aps/941-23456-0001");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let request = ApMove {
		serial_number: "941-23456-0001".into(),
		// Canonical identifier, so no venue listing is needed.
		venue: "3f2c7a9e-1b4d-4c8a-9f3e-2d6b8a1c5e7f".into(),
		ap_group_id: None,
	};
	let err = gateway
		.move_ap(request, None)
		.await
		.expect_err("A missing tracking identifier must be a hard error for AP moves.");

	assert!(matches!(err, Error::Protocol(_)));

	move_mock.assert_async().await;
}

#[tokio::test]
async fn ap_move_polls_the_activity_to_completion() {
	let server = MockServer::start_async().await;
	let gateway = build_gateway(&server);

	mock_token(&server).await;

	server
		.mock_async(|when, then| {
			when.method(PUT).path("/aps/941-23456-0002");
			then.status(202)
				.header("content-type", "application/json")
				.body("{\"requestId\":\"req-move-1\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/activities/req-move-1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"status\":\"SUCCESS\",\"endDatetime\":\"2025-06-01T12:00:00Z\"}");
		})
		.await;

	let request = ApMove {
		serial_number: "941-23456-0002".into(),
		venue: "3f2c7a9e-1b4d-4c8a-9f3e-2d6b8a1c5e7f".into(),
		ap_group_id: Some("group-1".into()),
	};
	let outcome =
		gateway.move_ap(request, None).await.expect("AP move should succeed end to end.");

	assert!(outcome.is_completed());
}
