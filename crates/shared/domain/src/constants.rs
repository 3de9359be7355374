//! Well-known identifiers shared across slices.

// Rendering contexts
pub const SITE: &str = "site";
pub const ADMIN: &str = "admin";
pub const SHARED: &str = "shared";
pub const FEATURE: &str = "feature";

/// Wildcard permission granting everything.
pub const ANY_PERMISSION: &str = "*";

// Permissions referenced by built-in layouts
pub const ADMIN_ACCESS: &str = "admin:access";
pub const ADMIN_VIEW: &str = "admin:view";
pub const ADMIN_EDIT: &str = "admin:edit";
pub const CONTENT_VIEW: &str = "content:view";
pub const CONTENT_EDIT: &str = "content:edit";
pub const USER_VIEW: &str = "user:view";
pub const SETTINGS_EDIT: &str = "settings:edit";
pub const ANALYTICS_VIEW: &str = "analytics:view";

/// Identifier of the emergency theme used when nothing could be loaded.
pub const FALLBACK_THEME_ID: &str = "fallback-theme";
/// Type identifier of the placeholder rendered for unknown components.
pub const UNREGISTERED_COMPONENT: &str = "UnregisteredComponent";
