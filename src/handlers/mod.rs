//! HTTP handlers for the exhibition resource.

pub mod exhibition;

pub use exhibition::*;
