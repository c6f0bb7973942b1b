//! Logout flow: local clearing always succeeds, remote notify is best effort.

// self
use crate::{
	gateway::Gateway,
	http::{ApiRequest, IdentityHttpClient},
	obs::{self, AuthFlow, AuthOutcome, AuthSpan},
};

impl<C> Gateway<C>
where
	C: ?Sized + IdentityHttpClient,
{
	/// Clears the session unconditionally and notifies the service when the
	/// wire shape has a logout endpoint.
	///
	/// The epoch bump makes any in-flight login discard its result instead of
	/// resurrecting the session. Vault and network failures are logged and
	/// swallowed; local state is already gone by then. Idempotent.
	pub async fn logout(&self) {
		const FLOW: AuthFlow = AuthFlow::Logout;

		let span = AuthSpan::new(FLOW, "logout");

		obs::record_auth_outcome(FLOW, AuthOutcome::Attempt);
		span.instrument(async move {
			let credential = self.store.snapshot().credential().cloned();

			self.bump_epoch();
			self.store.clear();
			self.clear_vault("logout.vault").await;

			if let (Some(credential), Some(endpoint)) =
				(credential, self.descriptor.endpoints.logout.clone())
			{
				let request = ApiRequest::post(endpoint).with_bearer(credential);

				if let Err(e) = self.http_client.execute(request).await {
					obs::note_best_effort("logout.notify", &e);
				}
			}
		})
		.await;
		obs::record_auth_outcome(FLOW, AuthOutcome::Success);
	}
}
