//! Repeatable group fields for DCA-style form registries
//!
//! `group-widget` turns a declarative "group" field (a palette of sub-fields
//! repeated `min..max` times) into concrete field definitions and a rewritten
//! palette string for the host form renderer.
//!
//! # Architecture
//!
//! - **Explicit registry**: the host's table-scoped field and palette store is a
//!   [`DcaRegistry`] passed by reference, never ambient global state
//! - **Validate on construction**: an invalid definition never yields a [`Group`]
//! - **Attach, never invoke**: load/save/render callbacks are named [`Hook`]s
//!   written into the generated definitions for the host to resolve
//! - **Opaque storage**: the stored element count comes from an [`ElementCounter`]

pub mod config;
pub mod definition;
pub mod error;
pub mod expand;
pub mod group;
pub mod hooks;
pub mod palette;
pub mod registry;
pub mod storage;

pub use config::WidgetConfig;
pub use definition::{deep_merge, Definition};
pub use error::{GroupError, InvalidReason, Result};
pub use expand::{Delimiter, Expansion};
pub use group::Group;
pub use hooks::{GroupHooks, Hook};
pub use registry::{DcaRegistry, TableConfig};
pub use storage::{ElementCounter, MemoryStorage, StorageType};
