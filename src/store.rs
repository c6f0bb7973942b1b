//! Durable-vault contracts and built-in backends for session persistence.

pub mod file;
pub mod memory;

pub use file::FileVault;
pub use memory::MemoryVault;

// self
use crate::{
	_prelude::*,
	auth::{Credential, Identity},
};

/// Boxed future returned by [`SessionVault`] operations.
pub type VaultFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, VaultError>> + 'a + Send>>;

/// Persistence contract mirroring the session's credential + identity pair.
///
/// The pair is atomic from the reader's perspective: `save` never exposes one
/// half without the other, `load` returns both or neither, and `clear`
/// removes both together. Corrupt or partial stored data reads as "no data"
/// and the backend heals itself by clearing the corrupt entries.
pub trait SessionVault
where
	Self: Send + Sync,
{
	/// Persists the credential + identity pair, replacing any previous entry.
	fn save<'a>(
		&'a self,
		credential: &'a Credential,
		identity: &'a Identity,
	) -> VaultFuture<'a, ()>;

	/// Returns the stored pair, or `None` when absent or unreadable.
	fn load(&self) -> VaultFuture<'_, Option<VaultEntry>>;

	/// Removes both halves of the pair.
	fn clear(&self) -> VaultFuture<'_, ()>;
}

/// Stored credential + identity pair with its save instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultEntry {
	/// Bearer credential awaiting re-validation.
	pub credential: Credential,
	/// Identity profile as of the last save.
	pub identity: Identity,
	/// Instant the pair was written.
	pub saved_at: OffsetDateTime,
}
impl VaultEntry {
	/// Builds an entry stamped with the current clock.
	pub fn new(credential: Credential, identity: Identity) -> Self {
		Self { credential, identity, saved_at: OffsetDateTime::now_utc() }
	}
}

/// Error type produced by [`SessionVault`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum VaultError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
