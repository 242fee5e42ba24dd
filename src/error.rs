//! Error handling for odz operations
//!
//! This module defines the error types used throughout the odz implementation.
//! It uses thiserror for ergonomic error handling and provides context-specific
//! error variants.

pub use crate::common::ErrorKind;
pub use crate::common::OdzError;
pub use crate::common::Result;
