#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use session_gate::{
	_preludet::*,
	access::AccessRequirement,
	guard::{GuardState, RouteGuard},
	service::ServiceDescriptor,
};

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
async fn guard_walks_the_full_lifecycle() {
	let server = MockServer::start_async().await;
	let (gateway, store, _vault) = build_reqwest_test_gateway(embedded_descriptor(&server));
	let guard = RouteGuard::new(store.clone(), AccessRequirement::SuperAdmin);
	let observed = Arc::new(Mutex::new(Vec::new()));
	let observed_in_callback = observed.clone();
	let _subscription = store.subscribe(move |session| {
		observed_in_callback.lock().push((session.is_loading(), session.is_authenticated()));
	});

	assert_eq!(guard.state(), GuardState::Unauthenticated);

	let _login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/login");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true,\"token\":\"tok-A\",\"admin\":{\"id\":\"1\",\"role\":0}}");
		})
		.await;
	let _logout_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/logout");
			then.status(200).body("{\"success\":true}");
		})
		.await;

	gateway.login("admin1@example.com", "pw").await.expect("Valid login should succeed.");

	assert_eq!(guard.state(), GuardState::Authorized);

	gateway.logout().await;

	assert_eq!(guard.state(), GuardState::Unauthenticated);
	assert_eq!(
		*observed.lock(),
		vec![(true, false), (false, true), (false, false)],
		"Subscribers should see loading, then authenticated, then cleared.",
	);
}

#[tokio::test]
async fn guard_forbids_sessions_missing_the_requirement() {
	let server = MockServer::start_async().await;
	let (gateway, store, _vault) = build_reqwest_test_gateway(two_step_descriptor(&server));
	let guard =
		RouteGuard::new(store.clone(), AccessRequirement::Permission("users.manage".into()));
	let _login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/admin/login");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"tok-B\"}");
		})
		.await;
	let _me_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/admin/me");
			then.status(200).header("content-type", "application/json").body(
				"{\"admin\":{\"id\":9,\"username\":\"ed\",\"role\":\"editor\",\
				 \"permissions\":[\"posts.write\"]}}",
			);
		})
		.await;

	gateway.login("ed", "pw").await.expect("Editor login should succeed.");

	let state = guard.state();

	assert!(matches!(state, GuardState::Forbidden { .. }));
	assert_eq!(
		state.denial_message().expect("Forbidden states should carry a denial message."),
		"Access denied: this area requires the `users.manage` permission.",
	);

	// the denied route never touches the session itself
	assert!(store.snapshot().is_authenticated());
}
