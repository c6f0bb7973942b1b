//! Thread-safe in-memory [`SessionVault`] for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{Credential, Identity},
	store::{SessionVault, VaultEntry, VaultFuture},
};

type VaultCell = Arc<RwLock<Option<VaultEntry>>>;

/// In-process vault keeping the pair behind an `RwLock` for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryVault(VaultCell);
impl SessionVault for MemoryVault {
	fn save<'a>(
		&'a self,
		credential: &'a Credential,
		identity: &'a Identity,
	) -> VaultFuture<'a, ()> {
		let cell = self.0.clone();

		Box::pin(async move {
			*cell.write() = Some(VaultEntry::new(credential.clone(), identity.clone()));

			Ok(())
		})
	}

	fn load(&self) -> VaultFuture<'_, Option<VaultEntry>> {
		let cell = self.0.clone();

		Box::pin(async move { Ok(cell.read().clone()) })
	}

	fn clear(&self) -> VaultFuture<'_, ()> {
		let cell = self.0.clone();

		Box::pin(async move {
			*cell.write() = None;

			Ok(())
		})
	}
}
