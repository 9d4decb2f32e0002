//! Shared identifier types, well-known roles and the caller context.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Page identifier (UUID-shaped for pages created by this crate)
pub type PageId = String;

/// Widget identifier, generated once and stable for the widget's lifetime
pub type WidgetId = String;

/// Set of role tokens. Ordered so that serialized output is deterministic.
pub type RoleSet = BTreeSet<String>;

/// Role granted to administrators
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Role granted to registered users
pub const ROLE_USER: &str = "ROLE_USER";

/// Who is calling and in which locale results should be rendered.
///
/// Passed explicitly into every use case instead of being read from
/// ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    pub roles: RoleSet,
    pub locale: Option<String>,
}

impl CallerContext {
    /// Caller without any role (anonymous visitor)
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            locale: None,
        }
    }

    pub fn in_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Caller holding both administrative and user roles
    pub fn admin() -> Self {
        Self::with_roles([ROLE_ADMIN, ROLE_USER])
    }
}

/// Build a [`RoleSet`] from string-like values
pub fn roles<I, S>(tokens: I) -> RoleSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tokens.into_iter().map(Into::into).collect()
}

/// Whether `value` is a hyphenated UUID, i.e. a page addressed by ID rather than alias
pub fn is_uuid(value: &str) -> bool {
    value.len() == 36 && uuid::Uuid::parse_str(value).is_ok()
}

/// Generate a fresh random identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
