//! # Domain Models
//!
//! Pure data types shared by the theme and layout slices: theme rows, component
//! tokens, layout documents and the application configuration.
//! Keep it lean: no I/O, no logging, no resolution logic; only data and trivial helpers.

pub mod config;
pub mod constants;
pub mod layout;
pub mod theme;
