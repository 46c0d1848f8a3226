//! Core type definitions used across the Vergo workspace.

pub mod id;

pub use id::*;
