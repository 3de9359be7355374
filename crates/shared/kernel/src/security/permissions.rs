use fxhash::FxHashSet;
use impulse_domain::constants::ANY_PERMISSION;
use std::fmt;

/// Opaque permission predicate supplied by the auth/RBAC collaborator.
pub trait PermissionCheck {
    /// Whether `permission` is granted.
    fn allows(&self, permission: &str) -> bool;

    /// Whether every permission in `required` is granted. Empty means allowed.
    fn allows_all<S: AsRef<str>>(&self, required: &[S]) -> bool
    where
        Self: Sized,
    {
        required.iter().all(|p| self.allows(p.as_ref()))
    }

    /// First permission of `required` that is not granted.
    fn first_denied<'a, S: AsRef<str>>(&self, required: &'a [S]) -> Option<&'a str>
    where
        Self: Sized,
    {
        required.iter().map(AsRef::<str>::as_ref).find(|p| !self.allows(p))
    }
}

impl<F> PermissionCheck for F
where
    F: Fn(&str) -> bool,
{
    fn allows(&self, permission: &str) -> bool {
        self(permission)
    }
}

/// A granted-permission set with `*` and `scope:*` wildcards.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct PermissionSet {
    granted: FxHashSet<String>,
}

impl PermissionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set that grants everything.
    #[must_use]
    pub fn all() -> Self {
        Self::from_iter([ANY_PERMISSION])
    }

    pub fn grant(&mut self, permission: impl Into<String>) -> &mut Self {
        self.granted.insert(permission.into());
        self
    }

    pub fn revoke(&mut self, permission: &str) -> bool {
        self.granted.remove(permission)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.granted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }
}

impl PermissionCheck for PermissionSet {
    fn allows(&self, permission: &str) -> bool {
        if self.granted.contains(ANY_PERMISSION) || self.granted.contains(permission) {
            return true;
        }

        // `content:*` grants `content:edit` and `content:drafts:publish`.
        let mut scope = permission;
        while let Some((head, _)) = scope.rsplit_once(':') {
            if self.granted.contains(&format!("{head}:*")) {
                return true;
            }
            scope = head;
        }
        false
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { granted: iter.into_iter().map(Into::into).collect() }
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sorted: Vec<_> = self.granted.iter().collect();
        sorted.sort();
        f.debug_set().entries(sorted).finish()
    }
}
