//! Shared response types.

pub mod jobs;

pub use jobs::*;
