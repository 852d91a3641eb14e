//! Core module - catalog data, resolvers and the selection workflow

pub mod adapter;
pub mod catalog;
pub mod compat;
pub mod config;
pub mod drawings;
pub mod import;
pub mod keys;
pub mod loader;
pub mod project;
pub mod report;
pub mod selection;
pub mod sizing;
pub mod suitability;

pub use adapter::find_adapter;
pub use catalog::{Catalog, CatalogError};
pub use compat::{find_bushing, is_shaft_compatible, ShaftFit};
pub use config::Config;
pub use keys::{DrawingKey, KeyParseError, PartCode, ShaftKey};
pub use project::{Project, ProjectError};
pub use selection::{Candidate, OperatingConditions, SelectionResult, SelectionSession, Step};
pub use sizing::Sizing;
pub use suitability::{classify, load_factor, LoadType, Suitability};
