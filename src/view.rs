//! Views (virtual desktops).
//!
//! A [`ViewSet`] only stores membership: which windows belong to which view
//! index, and which view is active.  Whether a window is visible is derived
//! from that; switching views returns a [`ViewSwitch`] telling the caller
//! which windows to unmap and which to map.
//!
//! A window may belong to several views at once (a "sticky" window), in
//! which case it stays visible across all of them.

use crate::command::WindowId;
use std::collections::{BTreeMap, BTreeSet};

/// Windows whose visibility has to change after a view switch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSwitch {
    /// Known windows that are not members of the new view.
    pub unmap: Vec<WindowId>,
    /// Members of the new view.
    pub map: Vec<WindowId>,
}

#[derive(Debug, Clone, Default)]
pub struct ViewSet {
    active: usize,
    members: BTreeMap<usize, BTreeSet<WindowId>>,
}

impl ViewSet {
    pub fn new(active: usize) -> Self {
        Self {
            active,
            members: BTreeMap::new(),
        }
    }

    /// Index of the active view.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Add `window` to the active view.
    pub fn register(&mut self, window: WindowId) {
        self.add(window, self.active);
    }

    /// Add `window` to `view`, keeping its other memberships.
    pub fn add(&mut self, window: WindowId, view: usize) {
        self.members.entry(view).or_default().insert(window);
    }

    /// Make `window` a member of `view` only.  Returns whether it is still
    /// visible afterwards.
    pub fn send(&mut self, window: WindowId, view: usize) -> bool {
        self.unregister_all(window);
        self.add(window, view);
        view == self.active
    }

    /// Remove `window` from every view.
    pub fn unregister_all(&mut self, window: WindowId) {
        self.members.retain(|_, set| {
            set.remove(&window);
            !set.is_empty()
        });
    }

    /// Whether `window` belongs to any view.
    pub fn contains(&self, window: WindowId) -> bool {
        self.members.values().any(|set| set.contains(&window))
    }

    /// Whether `window` belongs to the active view.
    pub fn is_visible(&self, window: WindowId) -> bool {
        self.members
            .get(&self.active)
            .is_some_and(|set| set.contains(&window))
    }

    /// Members of `view`, in id order.
    pub fn members(&self, view: usize) -> Vec<WindowId> {
        self.members
            .get(&view)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Views `window` belongs to, in index order.
    pub fn views_of(&self, window: WindowId) -> Vec<usize> {
        self.members
            .iter()
            .filter(|(_, set)| set.contains(&window))
            .map(|(view, _)| *view)
            .collect()
    }

    /// Make `view` the active view.
    pub fn switch_to(&mut self, view: usize) -> ViewSwitch {
        self.active = view;
        let shown = self.members.get(&view).cloned().unwrap_or_default();
        let known: BTreeSet<WindowId> = self.members.values().flatten().copied().collect();
        ViewSwitch {
            unmap: known.difference(&shown).copied().collect(),
            map: shown.into_iter().collect(),
        }
    }
}

//  Tests
