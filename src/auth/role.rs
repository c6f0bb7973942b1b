//! Unified role model covering both deployment variants.
//!
//! One deployment encodes roles as a small integer tier (0 = super admin,
//! 1 = admin); the other carries a role string plus a permission list. Both
//! live behind [`Role`] with a serde variant tag so vault snapshots remain
//! readable across deployments.

// self
use crate::_prelude::*;

/// Tier value designating the super admin in numeric-role deployments.
pub const SUPER_ADMIN_TIER: u8 = 0;

/// Role strings designating the super admin in string-role deployments.
pub const SUPER_ADMIN_NAMES: [&str; 2] = ["super_admin", "superadmin"];

/// Access role attached to an identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Role {
	/// Tier-based role; lower tiers are more privileged.
	NumericRole {
		/// Access tier (0 = super admin, 1 = admin).
		tier: u8,
	},
	/// Named role with fine-grained permission strings.
	StringRole {
		/// Case-sensitive role name.
		role: String,
		/// Capability strings granted alongside the role.
		#[serde(default)]
		permissions: Vec<String>,
	},
}
impl Role {
	/// Builds a tier-based role.
	pub fn tier(tier: u8) -> Self {
		Self::NumericRole { tier }
	}

	/// Builds a named role with the provided permission strings.
	pub fn named(
		role: impl Into<String>,
		permissions: impl IntoIterator<Item = impl Into<String>>,
	) -> Self {
		Self::StringRole {
			role: role.into(),
			permissions: permissions.into_iter().map(Into::into).collect(),
		}
	}

	/// Exact-match comparison against a requirement. Numeric roles compare
	/// numerically, string roles case-sensitively.
	pub fn matches(&self, required: &RoleMatcher) -> bool {
		match (self, required) {
			(Self::NumericRole { tier }, RoleMatcher::Tier(required)) => tier == required,
			(Self::StringRole { role, .. }, RoleMatcher::Named(required)) => role == required,
			_ => false,
		}
	}

	/// Returns `true` for the designated super admin value of either variant.
	pub fn is_super_admin(&self) -> bool {
		match self {
			Self::NumericRole { tier } => *tier == SUPER_ADMIN_TIER,
			Self::StringRole { role, .. } => SUPER_ADMIN_NAMES.contains(&role.as_str()),
		}
	}

	/// Returns `true` when the permission list contains `permission`.
	///
	/// Numeric roles carry no permission list and always return `false`.
	pub fn grants(&self, permission: &str) -> bool {
		match self {
			Self::NumericRole { .. } => false,
			Self::StringRole { permissions, .. } =>
				permissions.iter().any(|granted| granted == permission),
		}
	}

	/// Human-readable label derived from the role value.
	pub fn label(&self) -> String {
		match self {
			Self::NumericRole { tier: 0 } => "Super Admin".into(),
			Self::NumericRole { tier: 1 } => "Admin".into(),
			Self::NumericRole { tier } => format!("Tier {tier}"),
			Self::StringRole { role, .. } if SUPER_ADMIN_NAMES.contains(&role.as_str()) =>
				"Super Admin".into(),
			Self::StringRole { role, .. } => role.clone(),
		}
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.label())
	}
}

/// Requirement value compared against a [`Role`] by the access evaluator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleMatcher {
	/// Matches a numeric role with exactly this tier.
	Tier(u8),
	/// Matches a string role with exactly this name (case-sensitive).
	Named(String),
}
impl Display for RoleMatcher {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Tier(tier) => write!(f, "role tier {tier}"),
			Self::Named(role) => write!(f, "the `{role}` role"),
		}
	}
}
