//! Small shared utilities.

pub mod hash;
