//! Dependency handlers - Edge mutations and graph queries.

mod add_dependency;
mod can_retire;
mod check_graph_integrity;
mod remove_dependency;

pub use add_dependency::{AddDependencyCommand, AddDependencyHandler, AddDependencyResult};
pub use can_retire::{CanRetireHandler, CanRetireQuery};
pub use check_graph_integrity::CheckGraphIntegrityHandler;
pub use remove_dependency::{
    RemoveDependencyCommand, RemoveDependencyHandler, RemoveDependencyResult,
};
