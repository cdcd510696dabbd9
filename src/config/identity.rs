//! Identity configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Where role grants come from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfig {
    /// YAML role map; when unset no human actor holds any role
    pub roles_file: Option<PathBuf>,
}
