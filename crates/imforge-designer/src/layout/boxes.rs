// ── BoxLayout ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Fixed(f32),
    /// Percentage of the space left after fixed slots and spacing.
    Stretch(f32),
}

/// One-dimensional distribution of a run of items: fixed items keep their
/// size, stretch items share what is left.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxLayout {
    avail: f32,
    spacing: f32,
    slots: Vec<Slot>,
}

/// A box over one row (widths).
pub type HBox = BoxLayout;
/// A box over one column (heights).
pub type VBox = BoxLayout;

impl BoxLayout {
    pub fn new(avail: f32, spacing: f32) -> Self {
        Self { avail, spacing, slots: Vec::new() }
    }

    /// Adds a fixed slot and returns its index.
    pub fn add_fixed(&mut self, size: f32) -> usize {
        self.slots.push(Slot::Fixed(size));
        self.slots.len() - 1
    }

    /// Adds a stretch slot and returns its index. `pct` is clamped to be
    /// non-negative.
    pub fn add_stretch(&mut self, pct: f32) -> usize {
        self.slots.push(Slot::Stretch(pct.max(0.0)));
        self.slots.len() - 1
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Size of every slot. When the stretch percentages add up to more than
    /// 100 they are scaled down to share the remaining space exactly.
    pub fn resolve(&self) -> Vec<f32> {
        let gaps = self.spacing * self.slots.len().saturating_sub(1) as f32;
        let mut fixed = 0.0;
        let mut pct = 0.0;
        for s in &self.slots {
            match *s {
                Slot::Fixed(v) => fixed += v,
                Slot::Stretch(p) => pct += p,
            }
        }
        let remaining = (self.avail - fixed - gaps).max(0.0);
        let scale = if pct > 100.0 { 100.0 / pct } else { 1.0 };
        self.slots
            .iter()
            .map(|s| match *s {
                Slot::Fixed(v) => v,
                Slot::Stretch(p) => remaining * p / 100.0 * scale,
            })
            .collect()
    }
}

// ── BoxStacks ─────────────────────────────────────────────────────────────

/// The box contexts a container has open during a layout pass. Boxes nest
/// strictly: the last one opened is the first one closed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxStacks {
    pub(crate) hbox: Vec<HBox>,
    pub(crate) vbox: Vec<VBox>,
}

impl BoxStacks {
    /// `true` when no box is open, as at the end of every pass.
    pub fn is_balanced(&self) -> bool {
        self.hbox.is_empty() && self.vbox.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stretch_shares_remaining() {
        let mut b = HBox::new(200.0, 0.0);
        b.add_fixed(100.0);
        b.add_stretch(50.0);
        b.add_stretch(50.0);
        assert_eq!(b.resolve(), vec![100.0, 50.0, 50.0]);
    }

    #[test]
    fn spacing_is_subtracted() {
        let mut b = VBox::new(100.0, 10.0);
        b.add_fixed(20.0);
        b.add_stretch(100.0);
        assert_eq!(b.resolve(), vec![20.0, 70.0]);
    }

    #[test]
    fn oversubscribed_percentages_scale_down() {
        let mut b = HBox::new(100.0, 0.0);
        b.add_stretch(100.0);
        b.add_stretch(100.0);
        assert_eq!(b.resolve(), vec![50.0, 50.0]);
    }

    #[test]
    fn no_room_left() {
        let mut b = HBox::new(50.0, 0.0);
        b.add_fixed(80.0);
        b.add_stretch(100.0);
        assert_eq!(b.resolve(), vec![80.0, 0.0]);
        assert_eq!(b.len(), 2);
    }
}
