use std::fmt;

use crate::config::DesignerConfig;
use crate::serialize::ImportError;

/// Stable identity of a node. Allocated by [`UiContext`], never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Identity of prototype instances that never enter a document.
    pub(crate) const DETACHED: NodeId = NodeId(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-document editing state shared by every operation on one tree.
#[derive(Debug)]
pub struct UiContext {
    pub config: DesignerConfig,
    next_id: u64,
    modified: bool,
    import_errors: Vec<ImportError>,
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new(DesignerConfig::default())
    }
}

impl UiContext {
    pub fn new(config: DesignerConfig) -> Self {
        Self { config, next_id: 1, modified: false, import_errors: Vec::new() }
    }

    pub fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// `true` once any edit went through since the last save.
    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    #[inline]
    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    pub(crate) fn report(&mut self, err: ImportError) {
        self.import_errors.push(err);
    }

    /// Errors of subtrees skipped by the last imports.
    pub fn import_errors(&self) -> &[ImportError] {
        &self.import_errors
    }

    pub fn take_import_errors(&mut self) -> Vec<ImportError> {
        std::mem::take(&mut self.import_errors)
    }
}
