//! Backend seams for the FPT asset-resolution manager.
//!
//! The manager core talks to two external collaborators, both abstracted
//! here behind traits so tests can substitute in-process doubles:
//! - [`AssetDatabase`] — the production-tracking service holding asset
//!   records, queried by composite (type, id) key. [`HttpAssetDatabase`] is
//!   the real client; [`InMemoryDatabase`] the test/dev double.
//! - [`TemplateEngine`] — named path templates mapping ordered field values
//!   to filesystem locations. [`TemplateSet`] loads definitions from TOML.
//!
//! Also home to [`ManagerSettings`], the configuration consumed at manager
//! initialization, including the environment-supplied session override.

mod database;
mod error;
mod memory;
mod record;
mod settings;
mod template;

pub use database::{AssetDatabase, HttpAssetDatabase};
pub use error::BackendError;
pub use memory::InMemoryDatabase;
pub use record::AssetRecord;
pub use settings::{ManagerSettings, SessionUser, SESSION_USER_ENV};
pub use template::{FieldValue, KeyKind, PathTemplate, TemplateEngine, TemplateKey, TemplateSet};
