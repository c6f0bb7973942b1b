//! File-backed [`SessionVault`] for deployments that survive process restarts.
//!
//! The snapshot holds two keyed string entries, one for the bearer token and
//! one for the serialized identity. Both are written together through a
//! temp-file + rename so a reader never observes one without the other, and
//! unreadable entries are cleared on sight instead of surfacing as errors.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{Credential, Identity},
	store::{SessionVault, VaultEntry, VaultError, VaultFuture},
};

const CREDENTIAL_KEY: &str = "session.credential";
const IDENTITY_KEY: &str = "session.identity";
const SAVED_AT_KEY: &str = "session.saved_at";

enum Decoded {
	Present(Box<VaultEntry>),
	Absent,
	Corrupt,
}

/// Persists the session pair to a JSON snapshot after each mutation.
#[derive(Clone, Debug)]
pub struct FileVault {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<String, String>>>,
}
impl FileVault {
	/// Opens (or creates) a vault at the provided path, eagerly loading
	/// existing data. An unreadable snapshot is discarded, not propagated.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, VaultError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = match Self::load_snapshot(&path) {
			Ok(entries) => entries,
			Err(VaultError::Serialization { .. }) => {
				fs::remove_file(&path).map_err(|e| VaultError::Backend {
					message: format!("Failed to discard corrupt {}: {e}", path.display()),
				})?;

				HashMap::new()
			},
			Err(e) => return Err(e),
		};

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<String, String>, VaultError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let metadata = path.metadata().map_err(|e| VaultError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| VaultError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		serde_json::from_slice(&bytes).map_err(|e| VaultError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), VaultError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| VaultError::Backend {
				message: format!("Failed to create vault directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &HashMap<String, String>) -> Result<(), VaultError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| VaultError::Serialization {
				message: format!("Failed to serialize vault snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| VaultError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| VaultError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| VaultError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| VaultError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	fn decode(contents: &HashMap<String, String>) -> Decoded {
		match (contents.get(CREDENTIAL_KEY), contents.get(IDENTITY_KEY)) {
			(None, None) => Decoded::Absent,
			(Some(credential), Some(identity_raw)) =>
				match serde_json::from_str::<Identity>(identity_raw) {
					Ok(identity) => {
						// saved_at is advisory metadata, not part of the atomic pair
						let saved_at = contents
							.get(SAVED_AT_KEY)
							.and_then(|raw| raw.parse::<i64>().ok())
							.and_then(|stamp| OffsetDateTime::from_unix_timestamp(stamp).ok())
							.unwrap_or_else(OffsetDateTime::now_utc);

						Decoded::Present(Box::new(VaultEntry {
							credential: Credential::new(credential.as_str()),
							identity,
							saved_at,
						}))
					},
					Err(_) => Decoded::Corrupt,
				},
			_ => Decoded::Corrupt,
		}
	}
}
impl SessionVault for FileVault {
	fn save<'a>(
		&'a self,
		credential: &'a Credential,
		identity: &'a Identity,
	) -> VaultFuture<'a, ()> {
		Box::pin(async move {
			let identity_raw =
				serde_json::to_string(identity).map_err(|e| VaultError::Serialization {
					message: format!("Failed to serialize identity: {e}"),
				})?;
			let mut guard = self.inner.write();

			guard.insert(CREDENTIAL_KEY.into(), credential.expose().into());
			guard.insert(IDENTITY_KEY.into(), identity_raw);
			guard.insert(
				SAVED_AT_KEY.into(),
				OffsetDateTime::now_utc().unix_timestamp().to_string(),
			);
			self.persist_locked(&guard)?;

			Ok(())
		})
	}

	fn load(&self) -> VaultFuture<'_, Option<VaultEntry>> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			match Self::decode(&guard) {
				Decoded::Present(entry) => Ok(Some(*entry)),
				Decoded::Absent => Ok(None),
				Decoded::Corrupt => {
					guard.clear();
					self.persist_locked(&guard)?;

					Ok(None)
				},
			}
		})
	}

	fn clear(&self) -> VaultFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			guard.clear();
			self.persist_locked(&guard)?;

			Ok(())
		})
	}
}
