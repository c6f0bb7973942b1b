//! Optional observability helpers for gateway flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `session_gate.auth` with the `flow`
//!   (operation) and `stage` (call site) fields, plus warnings for swallowed best-effort
//!   failures.
//! - Enable `metrics` to increment the `session_gate_auth_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Auth operations observed by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthFlow {
	/// Credential exchange triggered by the login form.
	Login,
	/// Silent re-check of a previously issued credential.
	Validate,
	/// Local (and best-effort remote) session teardown.
	Logout,
	/// Startup hydration from the durable vault.
	Restore,
}
impl AuthFlow {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthFlow::Login => "login",
			AuthFlow::Validate => "validate",
			AuthFlow::Logout => "logout",
			AuthFlow::Restore => "restore",
		}
	}
}
impl Display for AuthFlow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthOutcome {
	/// Entry to a gateway operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller or swallowed silently.
	Failure,
}
impl AuthOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthOutcome::Attempt => "attempt",
			AuthOutcome::Success => "success",
			AuthOutcome::Failure => "failure",
		}
	}
}
impl Display for AuthOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
