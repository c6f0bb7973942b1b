//! Pure access decisions derived from a session snapshot.
//!
//! Every function here is total over any [`Session`] value: an empty or
//! loading session yields `false` / "Guest", never a panic, and nothing in
//! this module performs I/O or mutates state.

// self
use crate::{
	_prelude::*,
	auth::RoleMatcher,
	session::Session,
};

/// `true` iff the session is authenticated and its role exactly matches.
pub fn has_role(session: &Session, required: &RoleMatcher) -> bool {
	session.identity().is_some_and(|identity| identity.role.matches(required))
}

/// `true` iff the session is authenticated as the designated super admin.
pub fn is_super_admin(session: &Session) -> bool {
	session.identity().is_some_and(|identity| identity.role.is_super_admin())
}

/// `true` iff the session's permission list contains `permission`.
///
/// Sessions without a permission list (numeric roles, or no identity at all)
/// return `false`, not an error.
pub fn has_permission(session: &Session, permission: &str) -> bool {
	session.identity().is_some_and(|identity| identity.role.grants(permission))
}

/// Human-readable role label; "Guest" when no identity is present.
pub fn role_name(session: &Session) -> String {
	session.identity().map_or_else(|| "Guest".into(), |identity| identity.role.label())
}

/// Per-route access requirement evaluated by the route guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessRequirement {
	/// Any authenticated session qualifies.
	Authenticated,
	/// The session's role must exactly match.
	Role(RoleMatcher),
	/// The session must hold this permission string.
	Permission(String),
	/// The session must belong to the designated super admin.
	SuperAdmin,
}
impl AccessRequirement {
	/// Evaluates the requirement against a session snapshot.
	pub fn is_satisfied_by(&self, session: &Session) -> bool {
		if !session.is_authenticated() {
			return false;
		}

		match self {
			Self::Authenticated => true,
			Self::Role(matcher) => has_role(session, matcher),
			Self::Permission(permission) => has_permission(session, permission),
			Self::SuperAdmin => is_super_admin(session),
		}
	}
}
impl Display for AccessRequirement {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Authenticated => f.write_str("an authenticated session"),
			Self::Role(matcher) => Display::fmt(matcher, f),
			Self::Permission(permission) => write!(f, "the `{permission}` permission"),
			Self::SuperAdmin => f.write_str("super admin access"),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{Credential, Identity, Role};

	fn numeric_session(tier: u8) -> Session {
		Session::authenticated(Identity::new("1", Role::tier(tier)), Credential::new("tok-A"))
	}

	fn named_session() -> Session {
		Session::authenticated(
			Identity::new("2", Role::named("editor", ["posts.write"])),
			Credential::new("tok-B"),
		)
	}

	#[test]
	fn empty_sessions_never_throw() {
		let empty = Session::empty();

		assert!(!has_role(&empty, &RoleMatcher::Tier(0)));
		assert!(!is_super_admin(&empty));
		assert!(!has_permission(&empty, "posts.write"));
		assert_eq!(role_name(&empty), "Guest");
	}

	#[test]
	fn role_checks_are_exact() {
		let admin = numeric_session(1);

		assert!(has_role(&admin, &RoleMatcher::Tier(1)));
		assert!(!has_role(&admin, &RoleMatcher::Tier(0)));
		assert!(!is_super_admin(&admin));
		assert!(is_super_admin(&numeric_session(0)));
	}

	#[test]
	fn permissions_require_a_permission_list() {
		assert!(has_permission(&named_session(), "posts.write"));
		assert!(!has_permission(&named_session(), "users.delete"));
		assert!(!has_permission(&numeric_session(0), "posts.write"));
	}

	#[test]
	fn role_names_label_the_variants() {
		assert_eq!(role_name(&numeric_session(0)), "Super Admin");
		assert_eq!(role_name(&numeric_session(1)), "Admin");
		assert_eq!(role_name(&named_session()), "editor");
	}

	#[test]
	fn requirements_fail_closed_without_authentication() {
		let loading = Session::loading();

		assert!(!AccessRequirement::Authenticated.is_satisfied_by(&loading));
		assert!(!AccessRequirement::SuperAdmin.is_satisfied_by(&Session::empty()));
		assert!(AccessRequirement::Authenticated.is_satisfied_by(&numeric_session(1)));
		assert!(
			AccessRequirement::Permission("posts.write".into()).is_satisfied_by(&named_session())
		);
		assert!(!AccessRequirement::Role(RoleMatcher::Tier(0)).is_satisfied_by(&numeric_session(1)));
	}

	#[test]
	fn requirements_describe_themselves() {
		assert_eq!(AccessRequirement::SuperAdmin.to_string(), "super admin access");
		assert_eq!(
			AccessRequirement::Permission("reports.read".into()).to_string(),
			"the `reports.read` permission",
		);
		assert_eq!(
			AccessRequirement::Role(RoleMatcher::Named("editor".into())).to_string(),
			"the `editor` role",
		);
		assert_eq!(AccessRequirement::Role(RoleMatcher::Tier(0)).to_string(), "role tier 0");
	}
}
