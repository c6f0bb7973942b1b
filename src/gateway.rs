//! Gateway translating UI intents into identity-service calls and session updates.

mod login;
mod logout;
mod validate;

// self
use crate::{
	_prelude::*,
	auth::{Credential, Identity},
	error::AuthError,
	http::{ApiRequest, IdentityHttpClient},
	service::{self, EmbeddedValidateReply, ServiceDescriptor, WhoAmIReply, WireShape},
	session::{Session, SessionStore},
	store::SessionVault,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestHttpClient>;

/// Coordinates session flows against a single identity-service descriptor.
///
/// The gateway owns the transport, descriptor, session store handle, and
/// optional vault so individual flows (login, silent validation, logout,
/// startup restore) can focus on wire semantics. It is the session cell's
/// only writer, and every write is a whole-session replacement. Logins are
/// serialized behind an async mutex; a logout issued while a login is in
/// flight bumps an epoch the login re-checks before committing, so clearing
/// always wins.
pub struct Gateway<C>
where
	C: ?Sized + IdentityHttpClient,
{
	/// HTTP client used for every outbound identity-service request.
	pub http_client: Arc<C>,
	/// Descriptor defining endpoints and the wire shape.
	pub descriptor: ServiceDescriptor,
	/// Shared session store this gateway writes to.
	pub store: SessionStore,
	/// Optional durable vault mirroring the session pair.
	pub vault: Option<Arc<dyn SessionVault>>,
	login_guard: Arc<AsyncMutex<()>>,
	epoch: Arc<Mutex<u64>>,
}
impl<C> Gateway<C>
where
	C: ?Sized + IdentityHttpClient,
{
	/// Creates a gateway that reuses the caller-provided transport.
	pub fn with_http_client(
		store: SessionStore,
		descriptor: ServiceDescriptor,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			descriptor,
			store,
			vault: None,
			login_guard: Default::default(),
			epoch: Default::default(),
		}
	}

	/// Attaches a durable vault so later process starts can restore silently.
	pub fn with_vault(mut self, vault: Arc<dyn SessionVault>) -> Self {
		self.vault = Some(vault);

		self
	}

	pub(crate) fn epoch_now(&self) -> u64 {
		*self.epoch.lock()
	}

	pub(crate) fn bump_epoch(&self) {
		*self.epoch.lock() += 1;
	}

	/// Clears the vault without letting failures escape; silent flows and
	/// logout must never be blocked by storage trouble.
	pub(crate) async fn clear_vault(&self, stage: &'static str) {
		if let Some(vault) = &self.vault {
			if let Err(e) = vault.clear().await {
				crate::obs::note_best_effort(stage, &e);
			}
		}
	}

	/// Publishes an authenticated session, mirroring the pair to the vault
	/// first so readers never see memory ahead of durable storage. A bumped
	/// epoch means a logout intervened; the result is discarded.
	pub(crate) async fn commit(
		&self,
		identity: Identity,
		credential: Credential,
		epoch: u64,
	) -> Result<Session> {
		if self.epoch_now() != epoch {
			self.store.clear();

			return Err(AuthError::Superseded.into());
		}
		if let Some(vault) = &self.vault {
			if let Err(e) = vault.save(&credential, &identity).await {
				self.clear_vault("commit.rollback").await;
				self.store.clear();

				return Err(e.into());
			}
		}

		let session = Session::authenticated(identity, credential);

		self.store.set(session.clone());

		Ok(session)
	}

	/// Fetches the identity behind a credential from the shape's identity
	/// endpoint (validate for embedded, "who am I" for two-step).
	pub(crate) async fn fetch_identity(&self, credential: &Credential) -> Result<Identity> {
		let request = ApiRequest::get(self.descriptor.endpoints.identity.clone())
			.with_bearer(credential.clone());
		let response = self.http_client.execute(request).await?;

		if !response.is_success() {
			return Err(AuthError::Rejected { message: service::rejection_message(&response) }.into());
		}

		let admin = match self.descriptor.shape {
			WireShape::Embedded => {
				let reply: EmbeddedValidateReply = response.parse()?;

				if !reply.success {
					return Err(AuthError::Rejected {
						message: "Credential was rejected by the identity service.".into(),
					}
					.into());
				}

				reply.admin.ok_or(AuthError::MissingIdentity)?
			},
			WireShape::TwoStep => response.parse::<WhoAmIReply>()?.admin,
		};

		Ok(admin.into_identity()?)
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestHttpClient> {
	/// Creates a gateway with the crate's default reqwest transport.
	///
	/// Callers needing custom TLS, proxies, or timeouts should build their
	/// own client and use [`Gateway::with_http_client`].
	pub fn new(store: SessionStore, descriptor: ServiceDescriptor) -> Self {
		Self::with_http_client(store, descriptor, ReqwestHttpClient::default())
	}
}
impl<C> Clone for Gateway<C>
where
	C: ?Sized + IdentityHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			descriptor: self.descriptor.clone(),
			store: self.store.clone(),
			vault: self.vault.clone(),
			login_guard: self.login_guard.clone(),
			epoch: self.epoch.clone(),
		}
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + IdentityHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("descriptor", &self.descriptor)
			.field("vault_attached", &self.vault.is_some())
			.finish()
	}
}
