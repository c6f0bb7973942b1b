//! Identity profile for the authenticated caller.

// self
use crate::{_prelude::*, auth::role::Role};

/// Profile data describing the authenticated caller.
///
/// An identity is only meaningful alongside a non-expired credential; the
/// session model enforces that pairing, so this struct carries no
/// authentication state of its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	/// Unique identifier assigned by the identity service.
	pub id: String,
	/// Display name, when the service provides one.
	pub name: Option<String>,
	/// Login handle (username or email), when the service provides one.
	pub handle: Option<String>,
	/// Access role attached to this identity.
	pub role: Role,
	/// Creation timestamp reported by the service.
	pub created_at: Option<OffsetDateTime>,
	/// Last-update timestamp reported by the service.
	pub updated_at: Option<OffsetDateTime>,
}
impl Identity {
	/// Creates an identity with the required fields only.
	pub fn new(id: impl Into<String>, role: Role) -> Self {
		Self { id: id.into(), name: None, handle: None, role, created_at: None, updated_at: None }
	}

	/// Sets the display name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Sets the login handle.
	pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
		self.handle = Some(handle.into());

		self
	}

	/// Sets the service-reported timestamps.
	pub fn with_timestamps(
		mut self,
		created_at: Option<OffsetDateTime>,
		updated_at: Option<OffsetDateTime>,
	) -> Self {
		self.created_at = created_at;
		self.updated_at = updated_at;

		self
	}

	/// Best label for display surfaces: name, then handle, then id.
	pub fn display_name(&self) -> &str {
		self.name.as_deref().or(self.handle.as_deref()).unwrap_or(&self.id)
	}
}
