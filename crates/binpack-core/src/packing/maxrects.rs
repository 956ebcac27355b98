use super::geometry::{leftovers, orientations, prune_contained};
use super::Packer;
use crate::types::{Bin, Panel, Placement, Rect};

/// Single-sheet packer keeping maximal, possibly overlapping, free rects.
///
/// Denser than [`GuillotinePacker`](super::GuillotinePacker) at the cost of
/// re-splitting every free rect the placed footprint touches.
#[derive(Debug, Clone)]
pub struct MaxRectsPacker {
    bin_width: f64,
    bin_height: f64,
    allow_rotation: bool,
    padding: f64,
    free_rects: Vec<Rect>,
    packed_rects: Vec<Placement>,
}

impl MaxRectsPacker {
    fn place_rect(&mut self, placed: &Placement) {
        let mut new_free_rects = Vec::with_capacity(self.free_rects.len() + 4);

        for free in &self.free_rects {
            if self.intersects(placed, free) {
                new_free_rects.extend(self.split_free_rect(free, placed));
            } else {
                new_free_rects.push(*free);
            }
        }

        self.free_rects = new_free_rects;
        prune_contained(&mut self.free_rects);
        self.packed_rects.push(placed.clone());
    }

    /// Parts of `free` left, right, below and above the padded footprint.
    /// Each remainder spans the full extent of `free` along the other axis.
    fn split_free_rect(&self, free: &Rect, placed: &Placement) -> Vec<Rect> {
        let mut rects = Vec::with_capacity(4);
        let used_right = placed.x + placed.width + self.padding;
        let used_top = placed.y + placed.height + self.padding;

        if placed.x > free.x {
            rects.push(Rect::new(free.x, free.y, placed.x - free.x, free.height));
        }

        if used_right < free.right() {
            rects.push(Rect::new(
                used_right,
                free.y,
                free.right() - used_right,
                free.height,
            ));
        }

        if placed.y > free.y {
            rects.push(Rect::new(free.x, free.y, free.width, placed.y - free.y));
        }

        if used_top < free.top() {
            rects.push(Rect::new(
                free.x,
                used_top,
                free.width,
                free.top() - used_top,
            ));
        }

        rects
    }

    /// Kerf is one-sided: only the placed rect's far edges are grown.
    fn intersects(&self, placed: &Placement, free: &Rect) -> bool {
        !(placed.x >= free.right()
            || placed.x + placed.width + self.padding <= free.x
            || placed.y >= free.top()
            || placed.y + placed.height + self.padding <= free.y)
    }
}

impl Packer for MaxRectsPacker {
    fn new(width: f64, height: f64, allow_rotation: bool, padding: f64) -> Self {
        Self {
            bin_width: width,
            bin_height: height,
            allow_rotation,
            padding,
            free_rects: vec![Rect::new(0.0, 0.0, width, height)],
            packed_rects: Vec::new(),
        }
    }

    /// Best Short Side Fit, ties broken by Best Long Side Fit.
    fn pack(&mut self, panel: &Panel) -> Option<Placement> {
        let mut best: Option<(Placement, f64, f64)> = None;

        for free in &self.free_rects {
            for orientation in orientations(panel, self.allow_rotation) {
                let Some((leftover_x, leftover_y)) = leftovers(&orientation, free, self.padding)
                else {
                    continue;
                };
                let short_side = leftover_x.min(leftover_y);
                let long_side = leftover_x.max(leftover_y);

                let better = match &best {
                    None => true,
                    Some((_, best_short, best_long)) => {
                        short_side < *best_short
                            || (short_side == *best_short && long_side < *best_long)
                    }
                };
                if better {
                    best = Some((
                        Placement {
                            id: panel.id.clone(),
                            x: free.x,
                            y: free.y,
                            width: orientation.width,
                            height: orientation.height,
                            rotated: orientation.rotated,
                        },
                        short_side,
                        long_side,
                    ));
                }
            }
        }

        let (placement, _, _) = best?;
        self.place_rect(&placement);

        Some(placement)
    }

    fn result(&self) -> Bin {
        let mut bin = Bin {
            width: self.bin_width,
            height: self.bin_height,
            rects: self.packed_rects.clone(),
            free_rects: self.free_rects.clone(),
            used_area: 0.0,
            efficiency: 0.0,
        };
        bin.refresh_stats();
        bin
    }
}
