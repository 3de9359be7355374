//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports the domain and provides config loading and the
//! permission predicate consumed by the layout resolver.
//!
//! ## Permission checks
//! ```rust
//! use impulse_kernel::security::{PermissionCheck, PermissionSet};
//!
//! let granted = PermissionSet::from_iter(["admin:view", "content:*"]);
//! assert!(granted.allows_all(&["admin:view", "content:edit"]));
//! assert!(!granted.allows("admin:edit"));
//!
//! // Any closure works as a predicate too.
//! let deny_all = |_: &str| false;
//! assert!(!deny_all.allows("admin:view"));
//! ```
//!
//! ## Config loading (non-wasm)
//! ```rust,ignore
//! use impulse_kernel::config::load_config;
//! use impulse_kernel::domain::config::AppConfig;
//!
//! let cfg: AppConfig = load_config(Some("impulse")).unwrap_or_default();
//! ```
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod security;

pub use impulse_domain as domain;
