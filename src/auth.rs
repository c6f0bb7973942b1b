//! Auth-domain models: credentials, roles, and identities.

pub mod credential;
pub mod identity;
pub mod role;

pub use credential::*;
pub use identity::*;
pub use role::*;
