#![cfg(feature = "reqwest")]

// std
use std::time::{Duration, Instant};
// crates.io
use httpmock::prelude::*;
// self
use session_gate::{
	_preludet::*,
	access,
	error::AuthError,
	service::ServiceDescriptor,
	store::SessionVault,
};

const EMAIL: &str = "admin1@example.com";
const PASSWORD: &str = "correct-horse";

fn embedded_descriptor(server: &MockServer) -> ServiceDescriptor {
	ServiceDescriptor::builder(
		Url::parse(&server.base_url()).expect("Mock server base URL should parse successfully."),
	)
	.embedded()
	.build()
	.expect("Embedded descriptor should build successfully.")
}

fn two_step_descriptor(server: &MockServer) -> ServiceDescriptor {
	ServiceDescriptor::builder(
		Url::parse(&server.base_url()).expect("Mock server base URL should parse successfully."),
	)
	.two_step()
	.build()
	.expect("Two-step descriptor should build successfully.")
}

#[tokio::test]
async fn embedded_login_publishes_and_persists_the_pair() {
	let server = MockServer::start_async().await;
	let (gateway, store, vault) = build_reqwest_test_gateway(embedded_descriptor(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/admin/login")
				.json_body(serde_json::json!({ "email": EMAIL, "password": PASSWORD }));
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"token\":\"tok-A\",\"admin\":{\"id\":\"1\",\"name\":\"Admin One\",\
				 \"email\":\"admin1@example.com\",\"role\":0}}",
			);
		})
		.await;
	let session = gateway.login(EMAIL, PASSWORD).await.expect("Valid login should succeed.");

	assert!(session.is_authenticated());
	assert!(access::is_super_admin(&session));
	assert_eq!(
		session.credential().expect("Authenticated sessions should carry the token.").expose(),
		"tok-A",
	);
	assert_eq!(store.snapshot(), session);

	mock.assert_async().await;

	let entry = vault
		.load()
		.await
		.expect("Vault load should succeed.")
		.expect("Vault should hold the pair after a successful login.");

	assert_eq!(entry.credential.expose(), "tok-A");
	assert_eq!(entry.identity.id, "1");
}

#[tokio::test]
async fn embedded_login_rejection_reports_the_inline_message() {
	let server = MockServer::start_async().await;
	let (gateway, store, vault) = build_reqwest_test_gateway(embedded_descriptor(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/login");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"message\":\"Invalid credentials\"}");
		})
		.await;
	let err = gateway
		.login(EMAIL, "wrong-password")
		.await
		.expect_err("Rejected credentials should surface to the caller.");

	assert!(matches!(err, Error::Auth(AuthError::Rejected { .. })));
	assert_eq!(err.to_string(), "Invalid credentials");

	let session = store.snapshot();

	assert!(!session.is_authenticated());
	assert!(!session.is_loading());
	assert_eq!(session.last_error(), Some("Invalid credentials"));
	assert!(
		vault.load().await.expect("Vault load should succeed.").is_none(),
		"Failed logins must not leave a persisted pair behind.",
	);

	mock.assert_async().await;
}

#[tokio::test]
async fn embedded_login_follows_up_when_the_profile_is_omitted() {
	let server = MockServer::start_async().await;
	let (gateway, store, _vault) = build_reqwest_test_gateway(embedded_descriptor(&server));
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/login");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true,\"token\":\"tok-C\"}");
		})
		.await;
	let validate_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/validate").header("authorization", "Bearer tok-C");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true,\"admin\":{\"id\":2,\"role\":1}}");
		})
		.await;
	let session =
		gateway.login(EMAIL, PASSWORD).await.expect("Login with a follow-up fetch should succeed.");

	assert!(session.is_authenticated());
	assert_eq!(access::role_name(&session), "Admin");
	assert_eq!(store.snapshot(), session);

	login_mock.assert_async().await;
	validate_mock.assert_async().await;
}

#[tokio::test]
async fn two_step_login_hydrates_via_who_am_i() {
	let server = MockServer::start_async().await;
	let (gateway, store, _vault) = build_reqwest_test_gateway(two_step_descriptor(&server));
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/admin/login")
				.json_body(serde_json::json!({ "username": "ops", "password": PASSWORD }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"tok-B\"}");
		})
		.await;
	let me_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/me").header("authorization", "Bearer tok-B");
			then.status(200).header("content-type", "application/json").body(
				"{\"admin\":{\"id\":9,\"username\":\"ops\",\"role\":\"editor\",\
				 \"permissions\":[\"posts.write\"]}}",
			);
		})
		.await;
	let session = gateway.login("ops", PASSWORD).await.expect("Two-step login should succeed.");

	assert!(session.is_authenticated());
	assert!(!access::is_super_admin(&session));
	assert!(access::has_permission(&session, "posts.write"));
	assert_eq!(access::role_name(&session), "editor");
	assert_eq!(store.snapshot(), session);

	login_mock.assert_async().await;
	me_mock.assert_async().await;
}

#[tokio::test]
async fn concurrent_logins_run_one_at_a_time() {
	let server = MockServer::start_async().await;
	let (gateway, store, _vault) = build_reqwest_test_gateway(embedded_descriptor(&server));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/login");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true,\"token\":\"tok-A\",\"admin\":{\"id\":\"1\",\"role\":0}}")
				.delay(Duration::from_millis(150));
		})
		.await;
	let started = Instant::now();
	let (first, second) =
		tokio::join!(gateway.login(EMAIL, PASSWORD), gateway.login(EMAIL, PASSWORD));

	first.expect("First concurrent login should succeed.");
	second.expect("Second concurrent login should succeed.");

	assert!(
		started.elapsed() >= Duration::from_millis(300),
		"Concurrent logins must be serialized, not raced.",
	);
	assert!(store.snapshot().is_authenticated());

	mock.assert_calls_async(2).await;
}
