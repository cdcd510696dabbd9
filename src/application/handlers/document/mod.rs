//! Document handlers - New families and new versions within a family.

mod create_document;
mod create_new_version;

pub use create_document::{CreateDocumentCommand, CreateDocumentHandler, CreateDocumentResult};
pub use create_new_version::{
    CreateNewVersionCommand, CreateNewVersionHandler, CreateNewVersionResult,
};
