//! Command implementations

pub mod adapter;
pub mod bushing;
pub mod candidates;
pub mod completions;
pub mod drawings;
pub mod import;
pub mod init;
pub mod motor;
pub mod ratios;
pub mod reducer;
pub mod select;
pub mod validate;
