//! Family module - Versions sharing a base number.
//!
//! A family is a computed view: latest and latest-effective lookup,
//! next version numbering and planning of new drafts.

mod errors;
mod version_family;

pub use errors::FamilyError;
pub use version_family::{NewVersionPlan, NewVersionRequest, VersionFamily};
