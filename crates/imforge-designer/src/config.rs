/// What import does when a widget subtree fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportPolicy {
    /// Record the error in the context, skip to the subtree's `@end` marker
    /// and keep importing its siblings.
    #[default]
    SkipSubtree,
    /// Fail the whole import with the first error.
    Abort,
}

/// Designer-wide settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignerConfig {
    /// Maximum distance, in logical pixels, at which a dragged edge snaps to
    /// a candidate edge.
    pub snap_tolerance: f32,
    pub import_policy: ImportPolicy,
    /// Spaces per nesting level in exported source.
    pub indent: usize,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self { snap_tolerance: 5.0, import_policy: ImportPolicy::default(), indent: 4 }
    }
}

impl DesignerConfig {
    pub fn snap_tolerance(mut self, px: f32) -> Self {
        self.snap_tolerance = px;
        self
    }

    pub fn import_policy(mut self, policy: ImportPolicy) -> Self {
        self.import_policy = policy;
        self
    }

    pub fn indent(mut self, spaces: usize) -> Self {
        self.indent = spaces;
        self
    }
}
