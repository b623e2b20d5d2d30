//! Module registry and bundle loading.
//!
//! A bundle is a directory of instruction modules plus an optional
//! `index.yaml` of aliases. [`BundleLoader`] reads bundles in precedence
//! order into a [`ModuleRegistry`]; the first registration of any id or
//! alias wins.

pub mod decode;
pub mod loader;
pub mod registry;
pub mod source;

pub use decode::{DecodeError, DocumentDecoder, YamlDecoder};
pub use loader::{BundleLoader, BundleReport, LoadReport};
pub use registry::{ModuleRegistry, Registration};
pub use source::{ContentSource, DEFAULT_INDEX_FILE, DirectorySource, SourceEntry, SourceError, StaticSource};
