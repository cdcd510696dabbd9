//! Identity adapters.
//!
//! - **StaticRoleProvider** - Role map loaded from YAML or built in code

mod static_role_provider;

pub use static_role_provider::{RoleMapFile, StaticRoleProvider};
