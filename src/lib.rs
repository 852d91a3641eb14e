//! gbx: servo motor and planetary gearbox selection
//!
//! Loads static motor, gearbox, bushing and adapter catalogs, decides which
//! gearboxes a motor can drive, sizes each pairing and rates it against the
//! load. The [`core`] resolvers are pure functions over a loaded
//! [`core::Catalog`]; [`cli`] is a thin front end over them.

pub mod cli;
pub mod core;
pub mod diagnostics;
pub mod entities;
pub mod logging;
