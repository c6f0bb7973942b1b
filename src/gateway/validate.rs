//! Silent validation and startup restore.
//!
//! Expired or invalid stored tokens are an expected occurrence, not a
//! user-visible error: every failure path here clears state quietly and the
//! loading flag always ends false, so the caller is simply asked to log in.

// self
use crate::{
	auth::Credential,
	gateway::Gateway,
	http::IdentityHttpClient,
	obs::{self, AuthFlow, AuthOutcome, AuthSpan},
	session::Session,
};

impl<C> Gateway<C>
where
	C: ?Sized + IdentityHttpClient,
{
	/// Re-checks a previously issued credential against the identity service.
	///
	/// On acceptance the identity is refreshed in the store (and vault); on
	/// any failure the session and vault are cleared silently. Returns the
	/// resulting snapshot rather than an error; there is nothing for a
	/// caller to surface.
	pub async fn validate(&self, credential: &Credential) -> Session {
		const FLOW: AuthFlow = AuthFlow::Validate;

		let span = AuthSpan::new(FLOW, "validate");

		obs::record_auth_outcome(FLOW, AuthOutcome::Attempt);

		let session = span
			.instrument(async move {
				let epoch = self.epoch_now();

				self.store.set(Session::loading());

				match self.fetch_identity(credential).await {
					Ok(identity) =>
						match self.commit(identity, credential.clone(), epoch).await {
							Ok(session) => session,
							Err(e) => {
								obs::note_best_effort("validate.commit", &e);

								self.store.snapshot()
							},
						},
					Err(e) => {
						obs::note_best_effort("validate.check", &e);
						self.clear_vault("validate.cleanup").await;
						self.store.clear();

						self.store.snapshot()
					},
				}
			})
			.await;

		if session.is_authenticated() {
			obs::record_auth_outcome(FLOW, AuthOutcome::Success);
		} else {
			obs::record_auth_outcome(FLOW, AuthOutcome::Failure);
		}

		session
	}

	/// Hydrates the session from the vault on process start.
	///
	/// Without a vault the session simply starts empty (fresh login after
	/// every reload). A loaded pair is re-validated silently; corrupt vault
	/// data was already healed to "no data" by the vault itself.
	pub async fn restore(&self) -> Session {
		const FLOW: AuthFlow = AuthFlow::Restore;

		let span = AuthSpan::new(FLOW, "restore");

		obs::record_auth_outcome(FLOW, AuthOutcome::Attempt);

		let session = span
			.instrument(async move {
				let Some(vault) = self.vault.clone() else {
					self.store.clear();

					return self.store.snapshot();
				};

				self.store.set(Session::loading());

				match vault.load().await {
					Ok(Some(entry)) => self.validate(&entry.credential).await,
					Ok(None) => {
						self.store.clear();

						self.store.snapshot()
					},
					Err(e) => {
						obs::note_best_effort("restore.load", &e);
						self.clear_vault("restore.cleanup").await;
						self.store.clear();

						self.store.snapshot()
					},
				}
			})
			.await;

		if session.is_authenticated() {
			obs::record_auth_outcome(FLOW, AuthOutcome::Success);
		} else {
			obs::record_auth_outcome(FLOW, AuthOutcome::Failure);
		}

		session
	}
}
