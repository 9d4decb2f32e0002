//! Container and leaf implementations of [`Visible`].

use super::Visible;
use crate::types::RoleSet;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;
use std::path::PathBuf;

impl<T: Visible> Visible for Option<T> {
    fn accept_restriction(&mut self, roles: &RoleSet) {
        if self.as_ref().is_some_and(|value| value.is_forbidden(roles)) {
            *self = None;
        } else if let Some(value) = self {
            value.accept_restriction(roles);
        }
    }

    fn accept_translation(&mut self, locale: Option<&str>) {
        if let Some(value) = self {
            value.accept_translation(locale);
        }
    }
}

impl<T: Visible + ?Sized> Visible for Box<T> {
    fn is_forbidden(&self, roles: &RoleSet) -> bool {
        (**self).is_forbidden(roles)
    }

    fn accept_restriction(&mut self, roles: &RoleSet) {
        (**self).accept_restriction(roles);
    }

    fn accept_translation(&mut self, locale: Option<&str>) {
        (**self).accept_translation(locale);
    }
}

impl<T: Visible> Visible for Vec<T> {
    fn accept_restriction(&mut self, roles: &RoleSet) {
        self.retain(|value| !value.is_forbidden(roles));
        for value in self.iter_mut() {
            value.accept_restriction(roles);
        }
    }

    fn accept_translation(&mut self, locale: Option<&str>) {
        for value in self.iter_mut() {
            value.accept_translation(locale);
        }
    }
}

// Set elements cannot be mutated in place, so sets only prune.
impl<T: Visible + Ord> Visible for BTreeSet<T> {
    fn accept_restriction(&mut self, roles: &RoleSet) {
        self.retain(|value| !value.is_forbidden(roles));
    }
}

impl<K: Visible + Ord, V: Visible> Visible for BTreeMap<K, V> {
    fn accept_restriction(&mut self, roles: &RoleSet) {
        self.retain(|key, value| !key.is_forbidden(roles) && !value.is_forbidden(roles));
        for value in self.values_mut() {
            value.accept_restriction(roles);
        }
    }

    fn accept_translation(&mut self, locale: Option<&str>) {
        for value in self.values_mut() {
            value.accept_translation(locale);
        }
    }
}

impl<K: Visible + Eq + Hash, V: Visible> Visible for HashMap<K, V> {
    fn accept_restriction(&mut self, roles: &RoleSet) {
        self.retain(|key, value| !key.is_forbidden(roles) && !value.is_forbidden(roles));
        for value in self.values_mut() {
            value.accept_restriction(roles);
        }
    }

    fn accept_translation(&mut self, locale: Option<&str>) {
        for value in self.values_mut() {
            value.accept_translation(locale);
        }
    }
}

macro_rules! leaf_visible {
    ($($ty:ty),* $(,)?) => {
        $(impl Visible for $ty {})*
    };
}

leaf_visible!(String, bool, char, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64, PathBuf);
