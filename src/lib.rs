//! Client-side admin session lifecycle—login, silent validation, durable vaults, and route
//! guarding against a remote identity service.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod access;
pub mod auth;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod http;
pub mod obs;
pub mod service;
pub mod session;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		gateway::{Gateway, ReqwestGateway},
		service::ServiceDescriptor,
		session::SessionStore,
		store::{MemoryVault, SessionVault},
	};

	/// Gateway type alias used by reqwest-backed integration tests.
	pub type ReqwestTestGateway = ReqwestGateway;

	/// Constructs a [`Gateway`] backed by a fresh store and an in-memory vault.
	pub fn build_reqwest_test_gateway(
		descriptor: ServiceDescriptor,
	) -> (ReqwestTestGateway, SessionStore, Arc<MemoryVault>) {
		let store = SessionStore::new();
		let vault_backend = Arc::new(MemoryVault::default());
		let vault: Arc<dyn SessionVault> = vault_backend.clone();
		let gateway = Gateway::new(store.clone(), descriptor).with_vault(vault);

		(gateway, store, vault_backend)
	}

	/// Constructs a session-only [`Gateway`] with no durable vault attached.
	pub fn build_reqwest_session_only_gateway(
		descriptor: ServiceDescriptor,
	) -> (ReqwestTestGateway, SessionStore) {
		let store = SessionStore::new();
		let gateway = Gateway::new(store.clone(), descriptor);

		(gateway, store)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, session_gate as _};
