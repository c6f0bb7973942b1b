//! Transport primitives for identity-service calls.
//!
//! The module exposes [`IdentityHttpClient`] so downstream crates can plug in
//! custom HTTP stacks. The gateway only ever speaks [`ApiRequest`] /
//! [`ApiResponse`], keeping flow logic independent of any concrete client.

// std
use std::ops::Deref;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::Credential,
	error::{AuthError, TransportError},
};

/// HTTP verbs used by identity-service endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiMethod {
	/// `GET` request.
	Get,
	/// `POST` request.
	Post,
}

/// Outbound request handed to the transport.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: ApiMethod,
	/// Absolute endpoint URL.
	pub url: Url,
	/// Bearer credential attached as an `Authorization` header, if any.
	pub bearer: Option<Credential>,
	/// JSON request body, if any.
	pub body: Option<serde_json::Value>,
}
impl ApiRequest {
	/// Builds a `GET` request for the provided URL.
	pub fn get(url: Url) -> Self {
		Self { method: ApiMethod::Get, url, bearer: None, body: None }
	}

	/// Builds a `POST` request for the provided URL.
	pub fn post(url: Url) -> Self {
		Self { method: ApiMethod::Post, url, bearer: None, body: None }
	}

	/// Attaches a bearer credential.
	pub fn with_bearer(mut self, credential: Credential) -> Self {
		self.bearer = Some(credential);

		self
	}

	/// Attaches a JSON body.
	pub fn with_json(mut self, body: serde_json::Value) -> Self {
		self.body = Some(body);

		self
	}
}

/// Raw response captured by the transport.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Deserializes the body, reporting the offending path on failure.
	pub fn parse<T>(&self) -> Result<T, AuthError>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| AuthError::MalformedResponse { source, status: Some(self.status) })
	}
}

/// Boxed future returned by [`IdentityHttpClient::execute`].
pub type ClientFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of calling the identity service.
///
/// Implementations must be `Send + Sync + 'static` so one client can be
/// shared across gateway instances without extra wrappers, and the returned
/// futures must stay `Send` so gateway flows can hop executors freely.
pub trait IdentityHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes the request, resolving with the raw status + body.
	fn execute(&self, request: ApiRequest) -> ClientFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one
/// place. Callers who need custom TLS, proxies, or timeouts configure their
/// own [`ReqwestClient`] and pass it through [`ReqwestHttpClient::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl IdentityHttpClient for ReqwestHttpClient {
	fn execute(&self, request: ApiRequest) -> ClientFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder = match request.method {
				ApiMethod::Get => client.get(request.url.clone()),
				ApiMethod::Post => client.post(request.url.clone()),
			};

			if let Some(credential) = &request.bearer {
				builder = builder.bearer_auth(credential.expose());
			}
			if let Some(body) = &request.body {
				builder = builder.json(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}
