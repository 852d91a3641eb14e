//! Catalog record types

pub mod adapter;
pub mod bushing;
pub mod drawing;
pub mod motor;
pub mod reducer;

pub use adapter::{Adapter, AdapterCatalog, AdapterEntry, AdapterMatch};
pub use bushing::Bushing;
pub use drawing::{DrawingIndex, DrawingSet};
pub use motor::Motor;
pub use reducer::{Ratio, RatioSpec, Reducer};
