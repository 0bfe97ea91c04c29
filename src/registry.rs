//! Dirty-state registries consulted before navigating away from unsaved
//! edits.

use std::collections::BTreeMap;

use tracing::trace;

/// Implemented by anything a router asks before leaving the current view.
pub trait NavigationGuard {
    fn has_dirty_state(&self) -> bool;

    fn can_navigate(&self) -> bool {
        !self.has_dirty_state()
    }
}

/// Dirty flag per model management section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelManagementStateRegistry {
    sections: BTreeMap<String, bool>,
}

impl ModelManagementStateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_section_state(&mut self, section: impl Into<String>, dirty: bool) {
        let section = section.into();
        trace!(section = %section, dirty, "section state");
        self.sections.insert(section, dirty);
    }

    pub fn section_state(&self, section: &str) -> Option<bool> {
        self.sections.get(section).copied()
    }

    pub fn has_dirty_state(&self) -> bool {
        self.sections.values().any(|dirty| *dirty)
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }
}

impl NavigationGuard for ModelManagementStateRegistry {
    fn has_dirty_state(&self) -> bool {
        ModelManagementStateRegistry::has_dirty_state(self)
    }
}

/// Dirty flag per administration tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminToolRegistry {
    tools: BTreeMap<String, bool>,
}

impl AdminToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tool_state(&mut self, tool: impl Into<String>, dirty: bool) {
        self.tools.insert(tool.into(), dirty);
    }

    pub fn tool_state(&self, tool: &str) -> Option<bool> {
        self.tools.get(tool).copied()
    }

    pub fn has_dirty_state(&self) -> bool {
        self.tools.values().any(|dirty| *dirty)
    }

    pub fn clear(&mut self) {
        self.tools.clear();
    }
}

impl NavigationGuard for AdminToolRegistry {
    fn has_dirty_state(&self) -> bool {
        AdminToolRegistry::has_dirty_state(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirty_when_any_section_is_dirty() {
        let mut registry = ModelManagementStateRegistry::new();
        assert!(!registry.has_dirty_state());
        registry.set_section_state("fields", false);
        registry.set_section_state("general", true);
        assert!(registry.has_dirty_state());
        assert!(!registry.can_navigate());

        registry.set_section_state("general", false);
        assert!(!registry.has_dirty_state());
    }

    #[test]
    fn clear_resets_state() {
        let mut registry = ModelManagementStateRegistry::new();
        registry.set_section_state("fields", true);
        registry.clear();
        assert!(!registry.has_dirty_state());
        assert_eq!(registry.section_state("fields"), None);
    }

    #[test]
    fn tool_registry_tracks_tools() {
        let mut tools = AdminToolRegistry::new();
        tools.set_tool_state("model-management", true);
        tools.set_tool_state("role-management", false);
        assert!(tools.has_dirty_state());
        assert_eq!(tools.tool_state("role-management"), Some(false));
        tools.clear();
        assert!(tools.can_navigate());
    }
}
