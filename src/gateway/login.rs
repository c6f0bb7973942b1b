//! Login flow: serialized credential exchange with logout-wins commit checks.
//!
//! A second `login` issued while one is outstanding waits on the guard
//! instead of racing the session cell. Failures of any kind leave the
//! session fully empty (no partial identity/credential) with the
//! human-readable message recorded for inline display, and the error is also
//! returned to the caller.

// self
use crate::{
	_prelude::*,
	auth::{Credential, Identity},
	error::AuthError,
	gateway::Gateway,
	http::{ApiRequest, IdentityHttpClient},
	obs::{self, AuthFlow, AuthOutcome, AuthSpan},
	service::{self, EmbeddedLoginReply, TwoStepLoginReply, WireShape},
	session::Session,
};

struct LoginOutcome {
	identity: Identity,
	credential: Credential,
}

impl<C> Gateway<C>
where
	C: ?Sized + IdentityHttpClient,
{
	/// Exchanges the handle + secret for an authenticated session.
	pub async fn login(&self, handle: &str, secret: &str) -> Result<Session> {
		const FLOW: AuthFlow = AuthFlow::Login;

		let span = AuthSpan::new(FLOW, "login");

		obs::record_auth_outcome(FLOW, AuthOutcome::Attempt);

		let result = span
			.instrument(async move {
				let guard = self.login_guard.clone();
				let _serialized = guard.lock().await;
				let epoch = self.epoch_now();

				self.store.set(Session::loading());

				match self.exchange_credentials(handle, secret).await {
					Ok(outcome) => self.commit(outcome.identity, outcome.credential, epoch).await,
					Err(e) => {
						self.clear_vault("login.cleanup").await;
						self.store.set(Session::failed(login_error_message(&e)));

						Err(e)
					},
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_auth_outcome(FLOW, AuthOutcome::Success),
			Err(_) => obs::record_auth_outcome(FLOW, AuthOutcome::Failure),
		}

		result
	}

	async fn exchange_credentials(&self, handle: &str, secret: &str) -> Result<LoginOutcome> {
		let body = match self.descriptor.shape {
			WireShape::Embedded => serde_json::json!({ "email": handle, "password": secret }),
			WireShape::TwoStep => serde_json::json!({ "username": handle, "password": secret }),
		};
		let request = ApiRequest::post(self.descriptor.endpoints.login.clone()).with_json(body);
		let response = self.http_client.execute(request).await?;

		if !response.is_success() {
			return Err(AuthError::Rejected { message: service::rejection_message(&response) }.into());
		}

		match self.descriptor.shape {
			WireShape::Embedded => {
				let reply: EmbeddedLoginReply = response.parse()?;

				if !reply.success {
					return Err(AuthError::Rejected {
						message: reply.message.unwrap_or_else(|| {
							"Login was rejected by the identity service.".into()
						}),
					}
					.into());
				}

				let credential =
					Credential::new(reply.token.ok_or(AuthError::MissingCredential)?);
				// some deployments embed the profile, others expect a follow-up call
				let identity = match reply.admin {
					Some(admin) => admin.into_identity()?,
					None => self.fetch_identity(&credential).await?,
				};

				Ok(LoginOutcome { identity, credential })
			},
			WireShape::TwoStep => {
				let reply: TwoStepLoginReply = response.parse()?;
				let credential = Credential::new(reply.access_token);
				let identity = self.fetch_identity(&credential).await?;

				Ok(LoginOutcome { identity, credential })
			},
		}
	}
}

fn login_error_message(err: &Error) -> String {
	match err {
		Error::Auth(AuthError::Rejected { message }) => message.clone(),
		other => other.to_string(),
	}
}
