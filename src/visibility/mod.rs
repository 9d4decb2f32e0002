//! Visibility projection
//!
//! Two independent walks over a result graph, applied by the service layer
//! as an explicit post-processing stage:
//!
//! - **restriction**: nodes forbidden for the caller's roles are removed
//!   (optional fields become `None`, collection entries are dropped);
//! - **translation**: every translatable text resolves its value for the
//!   caller's locale.
//!
//! Every node type implements [`Visible`]. Containers (`Option`, `Vec`, maps,
//! sets, `Box`) forward the walk to their elements, and leaf values (strings,
//! numbers, plain enums) are returned untouched, so the walk covers any graph
//! built from these pieces without the caller knowing its shape.

mod walk;

use crate::types::{CallerContext, RoleSet};

/// A node of a projectable graph
pub trait Visible {
    /// Whether this node must be hidden from a caller holding `roles`
    fn is_forbidden(&self, _roles: &RoleSet) -> bool {
        false
    }

    /// Prune forbidden descendants of this node
    fn accept_restriction(&mut self, _roles: &RoleSet) {}

    /// Resolve translatable descendants for `locale`
    fn accept_translation(&mut self, _locale: Option<&str>) {}
}

/// Restriction rule: an empty restriction set is visible to everyone,
/// otherwise the caller needs at least one of the restricted roles.
pub fn forbidden_for(restrictions: &RoleSet, roles: &RoleSet) -> bool {
    !restrictions.is_empty() && restrictions.is_disjoint(roles)
}

/// Remove everything in `graph` the caller may not see.
///
/// Returns `None` if the root itself is forbidden.
pub fn restrict<T: Visible>(mut graph: T, roles: &RoleSet) -> Option<T> {
    if graph.is_forbidden(roles) {
        return None;
    }
    graph.accept_restriction(roles);
    Some(graph)
}

/// Resolve all translatable texts in `graph` for `locale`.
///
/// Texts without a matching translation fall back to their default value.
pub fn translate<T: Visible>(graph: &mut T, locale: Option<&str>) {
    graph.accept_translation(locale);
}

/// The caller-specific projection applied to use-case results
#[derive(Debug, Clone, Default)]
pub struct Projection {
    roles: RoleSet,
    locale: Option<String>,
}

impl Projection {
    pub fn new(roles: RoleSet, locale: Option<String>) -> Self {
        Self { roles, locale }
    }

    pub fn for_caller(caller: &CallerContext) -> Self {
        Self::new(caller.roles.clone(), caller.locale.clone())
    }

    /// Restrict, then translate what remains
    pub fn apply<T: Visible>(&self, graph: T) -> Option<T> {
        let mut graph = restrict(graph, &self.roles)?;
        translate(&mut graph, self.locale.as_deref());
        Some(graph)
    }
}
