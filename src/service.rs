//! Identity-service descriptor: endpoints, wire shapes, and payload parsing.
//!
//! Two service shapes exist in the wild. [`WireShape::Embedded`] returns the
//! identity inside the login reply and exposes dedicated validate + logout
//! endpoints; [`WireShape::TwoStep`] returns only a token from login and
//! hydrates (and re-validates) the identity through a "who am I" endpoint,
//! with logout handled purely locally. Both are expressed by one validated
//! [`ServiceDescriptor`] so the rest of the crate never branches on raw URLs.

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	auth::{Identity, Role},
	error::AuthError,
	http::ApiResponse,
};

/// Wire shape spoken by the remote identity service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireShape {
	/// Login reply embeds the identity; dedicated validate + logout endpoints.
	Embedded,
	/// Login returns only a token; identity comes from a "who am I" endpoint
	/// and logout is purely local.
	TwoStep,
}

/// Absolute endpoint URLs resolved against the service base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceEndpoints {
	/// Credential-exchange endpoint (`POST`).
	pub login: Url,
	/// Identity hydration/validation endpoint (`GET`, bearer).
	pub identity: Url,
	/// Best-effort logout endpoint (`POST`, bearer), absent for local-only logout.
	pub logout: Option<Url>,
}

/// Validated description of a remote identity service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceDescriptor {
	/// Wire shape the service speaks.
	pub shape: WireShape,
	/// Resolved endpoint URLs.
	pub endpoints: ServiceEndpoints,
}
impl ServiceDescriptor {
	/// Returns a builder rooted at the provided base URL.
	pub fn builder(base: Url) -> ServiceDescriptorBuilder {
		ServiceDescriptorBuilder {
			base,
			shape: None,
			login_path: None,
			identity_path: None,
			logout_path: None,
		}
	}

	/// `true` when the service accepts a server-side logout notification.
	pub fn supports_remote_logout(&self) -> bool {
		self.endpoints.logout.is_some()
	}
}

/// Errors raised while building a [`ServiceDescriptor`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ServiceDescriptorError {
	/// Base URL uses plain HTTP on a non-loopback host.
	#[error("Identity service base URL must use HTTPS (got `{url}`).")]
	InsecureEndpoint {
		/// Offending base URL.
		url: String,
	},
	/// No wire shape was selected before building.
	#[error("Wire shape must be selected before building the descriptor.")]
	MissingShape,
	/// Endpoint path override is empty, which would collide with the base URL.
	#[error("Endpoint path override for the {endpoint} endpoint must not be empty.")]
	EmptyPath {
		/// Endpoint whose override was empty.
		endpoint: &'static str,
	},
	/// Endpoint path could not be resolved against the base URL.
	#[error("Endpoint path `{path}` cannot be joined to the base URL.")]
	InvalidPath {
		/// Offending path override.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Logout endpoint configured for a shape that performs logout locally.
	#[error("The two-step wire shape performs logout locally; no logout endpoint is accepted.")]
	LogoutNotSupported,
}

/// Builder for [`ServiceDescriptor`].
#[derive(Clone, Debug)]
pub struct ServiceDescriptorBuilder {
	base: Url,
	shape: Option<WireShape>,
	login_path: Option<String>,
	identity_path: Option<String>,
	logout_path: Option<String>,
}
impl ServiceDescriptorBuilder {
	const EMBEDDED_IDENTITY_PATH: &'static str = "/admin/validate";
	const EMBEDDED_LOGOUT_PATH: &'static str = "/admin/logout";
	const LOGIN_PATH: &'static str = "/admin/login";
	const TWO_STEP_IDENTITY_PATH: &'static str = "/admin/me";

	/// Selects the embedded wire shape.
	pub fn embedded(mut self) -> Self {
		self.shape = Some(WireShape::Embedded);

		self
	}

	/// Selects the two-step wire shape.
	pub fn two_step(mut self) -> Self {
		self.shape = Some(WireShape::TwoStep);

		self
	}

	/// Overrides the login endpoint path.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = Some(path.into());

		self
	}

	/// Overrides the identity (validate / "who am I") endpoint path.
	pub fn identity_path(mut self, path: impl Into<String>) -> Self {
		self.identity_path = Some(path.into());

		self
	}

	/// Overrides the logout endpoint path (embedded shape only).
	pub fn logout_path(mut self, path: impl Into<String>) -> Self {
		self.logout_path = Some(path.into());

		self
	}

	/// Validates and resolves the descriptor.
	pub fn build(self) -> Result<ServiceDescriptor, ServiceDescriptorError> {
		let shape = self.shape.ok_or(ServiceDescriptorError::MissingShape)?;

		if self.base.scheme() != "https" && !is_loopback(&self.base) {
			return Err(ServiceDescriptorError::InsecureEndpoint { url: self.base.to_string() });
		}

		for (endpoint, path) in [
			("login", self.login_path.as_deref()),
			("identity", self.identity_path.as_deref()),
			("logout", self.logout_path.as_deref()),
		] {
			if path.is_some_and(|path| path.trim().is_empty()) {
				return Err(ServiceDescriptorError::EmptyPath { endpoint });
			}
		}

		let login_path = self.login_path.as_deref().unwrap_or(Self::LOGIN_PATH);
		let identity_path = self.identity_path.as_deref().unwrap_or(match shape {
			WireShape::Embedded => Self::EMBEDDED_IDENTITY_PATH,
			WireShape::TwoStep => Self::TWO_STEP_IDENTITY_PATH,
		});
		let logout = match (shape, self.logout_path.as_deref()) {
			(WireShape::TwoStep, Some(_)) => return Err(ServiceDescriptorError::LogoutNotSupported),
			(WireShape::TwoStep, None) => None,
			(WireShape::Embedded, path) =>
				Some(join(&self.base, path.unwrap_or(Self::EMBEDDED_LOGOUT_PATH))?),
		};

		Ok(ServiceDescriptor {
			shape,
			endpoints: ServiceEndpoints {
				login: join(&self.base, login_path)?,
				identity: join(&self.base, identity_path)?,
				logout,
			},
		})
	}
}

fn join(base: &Url, path: &str) -> Result<Url, ServiceDescriptorError> {
	base.join(path)
		.map_err(|source| ServiceDescriptorError::InvalidPath { path: path.into(), source })
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain == "localhost",
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

/// Login reply for the embedded shape.
#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddedLoginReply {
	#[serde(default)]
	pub success: bool,
	pub token: Option<String>,
	pub admin: Option<WireAdmin>,
	pub message: Option<String>,
}

/// Validate reply for the embedded shape.
#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddedValidateReply {
	#[serde(default)]
	pub success: bool,
	pub admin: Option<WireAdmin>,
}

/// Login reply for the two-step shape.
#[derive(Debug, Deserialize)]
pub(crate) struct TwoStepLoginReply {
	pub access_token: String,
}

/// "Who am I" reply for the two-step shape.
#[derive(Debug, Deserialize)]
pub(crate) struct WhoAmIReply {
	pub admin: WireAdmin,
}

/// Admin payload as the services actually emit it: string-or-number ids,
/// `id` or `_id`, `email` or `username`, numeric or string roles.
#[derive(Debug, Deserialize)]
pub(crate) struct WireAdmin {
	#[serde(alias = "_id")]
	pub id: serde_json::Value,
	pub name: Option<String>,
	#[serde(alias = "email")]
	pub username: Option<String>,
	pub role: Option<serde_json::Value>,
	pub permissions: Option<Vec<String>>,
	#[serde(alias = "createdAt")]
	pub created_at: Option<String>,
	#[serde(alias = "updatedAt")]
	pub updated_at: Option<String>,
}
impl WireAdmin {
	/// Normalizes the raw payload into a crate [`Identity`].
	pub(crate) fn into_identity(self) -> Result<Identity, AuthError> {
		let id = match self.id {
			serde_json::Value::String(id) => id,
			serde_json::Value::Number(id) => id.to_string(),
			_ => return Err(AuthError::UnsupportedField { field: "id" }),
		};
		let role = match self.role {
			Some(serde_json::Value::Number(tier)) => {
				let tier = tier
					.as_u64()
					.and_then(|value| u8::try_from(value).ok())
					.ok_or(AuthError::UnsupportedField { field: "role" })?;

				Role::tier(tier)
			},
			Some(serde_json::Value::String(role)) => Role::StringRole {
				role,
				permissions: self.permissions.unwrap_or_default(),
			},
			_ => return Err(AuthError::UnsupportedField { field: "role" }),
		};
		let mut identity = Identity::new(id, role)
			.with_timestamps(parse_instant(self.created_at), parse_instant(self.updated_at));

		if let Some(name) = self.name {
			identity = identity.with_name(name);
		}
		if let Some(handle) = self.username {
			identity = identity.with_handle(handle);
		}

		Ok(identity)
	}
}

fn parse_instant(raw: Option<String>) -> Option<OffsetDateTime> {
	raw.and_then(|value| OffsetDateTime::parse(&value, &Rfc3339).ok())
}

/// Extracts the human-readable rejection message from an error response body,
/// falling back to a status-based message for opaque bodies.
pub(crate) fn rejection_message(response: &ApiResponse) -> String {
	serde_json::from_slice::<serde_json::Value>(&response.body)
		.ok()
		.and_then(|value| {
			["message", "error"].iter().find_map(|key| {
				value.get(key).and_then(serde_json::Value::as_str).map(str::to_owned)
			})
		})
		.unwrap_or_else(|| {
			format!("Identity service rejected the request (HTTP {}).", response.status)
		})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	#[test]
	fn builder_rejects_insecure_non_loopback_bases() {
		let err = ServiceDescriptor::builder(url("http://example.com"))
			.embedded()
			.build()
			.expect_err("Plain HTTP on a public host should be rejected.");

		assert!(matches!(err, ServiceDescriptorError::InsecureEndpoint { .. }));

		ServiceDescriptor::builder(url("http://127.0.0.1:8080"))
			.embedded()
			.build()
			.expect("Loopback HTTP should be accepted for local development.");
		ServiceDescriptor::builder(url("http://localhost:8080"))
			.two_step()
			.build()
			.expect("localhost HTTP should be accepted for local development.");
	}

	#[test]
	fn builder_requires_a_shape() {
		let err = ServiceDescriptor::builder(url("https://example.com"))
			.build()
			.expect_err("Shape-less descriptors should be rejected.");

		assert!(matches!(err, ServiceDescriptorError::MissingShape));
	}

	#[test]
	fn builder_rejects_empty_path_overrides() {
		let err = ServiceDescriptor::builder(url("https://example.com"))
			.embedded()
			.login_path("")
			.build()
			.expect_err("Empty path overrides should be rejected.");

		assert!(matches!(err, ServiceDescriptorError::EmptyPath { endpoint: "login" }));

		let err = ServiceDescriptor::builder(url("https://example.com"))
			.embedded()
			.identity_path("  ")
			.build()
			.expect_err("Whitespace-only path overrides should be rejected.");

		assert!(matches!(err, ServiceDescriptorError::EmptyPath { endpoint: "identity" }));
	}

	#[test]
	fn shapes_pick_their_default_endpoints() {
		let embedded = ServiceDescriptor::builder(url("https://example.com"))
			.embedded()
			.build()
			.expect("Embedded descriptor should build.");

		assert_eq!(embedded.endpoints.login.as_str(), "https://example.com/admin/login");
		assert_eq!(embedded.endpoints.identity.as_str(), "https://example.com/admin/validate");
		assert!(embedded.supports_remote_logout());

		let two_step = ServiceDescriptor::builder(url("https://example.com"))
			.two_step()
			.build()
			.expect("Two-step descriptor should build.");

		assert_eq!(two_step.endpoints.identity.as_str(), "https://example.com/admin/me");
		assert!(!two_step.supports_remote_logout());
	}

	#[test]
	fn two_step_rejects_logout_overrides() {
		let err = ServiceDescriptor::builder(url("https://example.com"))
			.two_step()
			.logout_path("/admin/logout")
			.build()
			.expect_err("Two-step logout endpoints should be rejected.");

		assert!(matches!(err, ServiceDescriptorError::LogoutNotSupported));
	}

	#[test]
	fn wire_admin_accepts_numeric_roles_and_ids() {
		let admin: WireAdmin =
			serde_json::from_str("{\"_id\":7,\"name\":\"Ada\",\"email\":\"ada@example.com\",\"role\":0}")
				.expect("Numeric-role admin payload should deserialize.");
		let identity = admin.into_identity().expect("Numeric-role payload should normalize.");

		assert_eq!(identity.id, "7");
		assert_eq!(identity.handle.as_deref(), Some("ada@example.com"));
		assert!(identity.role.is_super_admin());
	}

	#[test]
	fn wire_admin_accepts_string_roles_with_permissions() {
		let admin: WireAdmin = serde_json::from_str(
			"{\"id\":\"42\",\"username\":\"ed\",\"role\":\"editor\",\"permissions\":[\"posts.write\"],\
			 \"createdAt\":\"2024-03-01T10:00:00Z\"}",
		)
		.expect("String-role admin payload should deserialize.");
		let identity = admin.into_identity().expect("String-role payload should normalize.");

		assert!(identity.role.grants("posts.write"));
		assert!(!identity.role.is_super_admin());
		assert!(identity.created_at.is_some());
		assert!(identity.updated_at.is_none());
	}

	#[test]
	fn wire_admin_rejects_unusable_fields() {
		let bad_role: WireAdmin = serde_json::from_str("{\"id\":\"1\",\"role\":true}")
			.expect("Payload should deserialize before normalization.");

		assert!(matches!(
			bad_role.into_identity(),
			Err(AuthError::UnsupportedField { field: "role" })
		));

		let missing_role: WireAdmin = serde_json::from_str("{\"id\":\"1\"}")
			.expect("Payload should deserialize before normalization.");

		assert!(matches!(
			missing_role.into_identity(),
			Err(AuthError::UnsupportedField { field: "role" })
		));
	}

	#[test]
	fn rejection_messages_prefer_service_payloads() {
		let with_message =
			ApiResponse { status: 401, body: b"{\"message\":\"Invalid credentials\"}".to_vec() };

		assert_eq!(rejection_message(&with_message), "Invalid credentials");

		let with_error = ApiResponse { status: 403, body: b"{\"error\":\"forbidden\"}".to_vec() };

		assert_eq!(rejection_message(&with_error), "forbidden");

		let opaque = ApiResponse { status: 502, body: b"<html>bad gateway</html>".to_vec() };

		assert_eq!(rejection_message(&opaque), "Identity service rejected the request (HTTP 502).");
	}
}
