//! Route-guard state machine deciding what a protected surface may render.

// self
use crate::{
	_prelude::*,
	access::AccessRequirement,
	session::{Session, SessionStore},
};

/// Render decision for a guarded route.
///
/// `Forbidden` is an authorization outcome, not an error: the session stays
/// untouched and the denial names the missing requirement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardState {
	/// Startup validation (or a login) is still in flight.
	Loading,
	/// No valid session; render the login prompt.
	Unauthenticated,
	/// Session satisfies the route requirement; render the protected content.
	Authorized,
	/// Session is valid but lacks the route requirement; render access denied.
	Forbidden {
		/// The unmet requirement, for the denial message.
		requirement: AccessRequirement,
	},
}
impl GuardState {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			GuardState::Loading => "loading",
			GuardState::Unauthenticated => "unauthenticated",
			GuardState::Authorized => "authorized",
			GuardState::Forbidden { .. } => "forbidden",
		}
	}

	/// Access-denied message naming the missing role/permission, for
	/// `Forbidden` states only.
	pub fn denial_message(&self) -> Option<String> {
		match self {
			GuardState::Forbidden { requirement } =>
				Some(format!("Access denied: this area requires {requirement}.")),
			_ => None,
		}
	}
}
impl Display for GuardState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Computes the guard state for a session snapshot and route requirement.
pub fn evaluate(session: &Session, requirement: &AccessRequirement) -> GuardState {
	if session.is_loading() {
		return GuardState::Loading;
	}
	if !session.is_authenticated() {
		return GuardState::Unauthenticated;
	}
	if requirement.is_satisfied_by(session) {
		GuardState::Authorized
	} else {
		GuardState::Forbidden { requirement: requirement.clone() }
	}
}

/// Guard bound to a session store and a per-route requirement.
///
/// Re-reading [`RouteGuard::state`] after each store update walks the
/// machine: `Loading` while startup validation runs, `Unauthenticated` once
/// it fails, `Authorized`/`Forbidden` after a successful login, and back to
/// `Unauthenticated` after logout or a failed silent re-validation.
#[derive(Clone, Debug)]
pub struct RouteGuard {
	store: SessionStore,
	requirement: AccessRequirement,
}
impl RouteGuard {
	/// Binds a guard to the shared store and route requirement.
	pub fn new(store: SessionStore, requirement: AccessRequirement) -> Self {
		Self { store, requirement }
	}

	/// The requirement this guard enforces.
	pub fn requirement(&self) -> &AccessRequirement {
		&self.requirement
	}

	/// Evaluates the current store snapshot.
	pub fn state(&self) -> GuardState {
		evaluate(&self.store.snapshot(), &self.requirement)
	}
}
