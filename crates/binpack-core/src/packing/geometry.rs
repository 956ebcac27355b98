use crate::types::{Panel, Rect};

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// True when every edge of `self` lies within `other`.
    pub fn is_contained_in(&self, other: &Rect) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.right() <= other.right()
            && self.top() <= other.top()
    }
}

/// Candidate orientation of a panel: footprint on the sheet and whether it
/// was obtained by swapping the panel's sides.
#[derive(Debug, Clone, Copy)]
pub(super) struct Orientation {
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

/// Orientations to evaluate, unrotated first.
pub(super) fn orientations(
    panel: &Panel,
    allow_rotation: bool,
) -> impl Iterator<Item = Orientation> {
    let upright = Orientation {
        width: panel.width,
        height: panel.height,
        rotated: false,
    };
    let turned = (allow_rotation && panel.can_rotate).then_some(Orientation {
        width: panel.height,
        height: panel.width,
        rotated: true,
    });

    std::iter::once(upright).chain(turned)
}

/// Leftover space along each axis when `orientation`, grown by `padding`, is
/// anchored in `free`. `None` when it does not fit.
pub(super) fn leftovers(
    orientation: &Orientation,
    free: &Rect,
    padding: f64,
) -> Option<(f64, f64)> {
    let used_width = orientation.width + padding;
    let used_height = orientation.height + padding;

    if used_width <= free.width && used_height <= free.height {
        Some((free.width - used_width, free.height - used_height))
    } else {
        None
    }
}

/// Drops every free rect that lies entirely inside another one.
///
/// Scans pairs in order; when two rects contain each other the earlier one is
/// dropped, so duplicates collapse to the later copy.
pub(super) fn prune_contained(free_rects: &mut Vec<Rect>) {
    let mut i = 0;
    while i < free_rects.len() {
        let mut j = i + 1;
        let mut removed_i = false;

        while j < free_rects.len() {
            if free_rects[i].is_contained_in(&free_rects[j]) {
                free_rects.remove(i);
                removed_i = true;
                break;
            }
            if free_rects[j].is_contained_in(&free_rects[i]) {
                free_rects.remove(j);
            } else {
                j += 1;
            }
        }

        if !removed_i {
            i += 1;
        }
    }
}
