pub mod permissions;

pub use permissions::{PermissionCheck, PermissionSet};
