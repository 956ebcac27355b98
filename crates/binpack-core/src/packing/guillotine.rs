use super::geometry::{leftovers, orientations, prune_contained};
use super::Packer;
use crate::types::{Bin, Panel, Placement, Rect};

/// Single-sheet packer that slices the host free rect into at most two
/// disjoint remainders on every placement.
#[derive(Debug, Clone)]
pub struct GuillotinePacker {
    bin_width: f64,
    bin_height: f64,
    allow_rotation: bool,
    padding: f64,
    free_rects: Vec<Rect>,
    packed_rects: Vec<Placement>,
}

impl GuillotinePacker {
    /// Cuts the right remainder (as tall as the used footprint) and the top
    /// remainder (full width of the host) out of `free`.
    fn split_free_rect(&mut self, free: Rect, placed: &Placement) {
        let used_width = placed.width + self.padding;
        let used_height = placed.height + self.padding;

        if free.width - used_width > 0.0 {
            self.free_rects.push(Rect::new(
                free.x + used_width,
                free.y,
                free.width - used_width,
                used_height,
            ));
        }

        if free.height - used_height > 0.0 {
            self.free_rects.push(Rect::new(
                free.x,
                free.y + used_height,
                free.width,
                free.height - used_height,
            ));
        }

        prune_contained(&mut self.free_rects);
    }
}

impl Packer for GuillotinePacker {
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

    /// Best Short Side Fit; the first candidate evaluated wins ties.
    fn pack(&mut self, panel: &Panel) -> Option<Placement> {
        let mut best: Option<(usize, Placement, f64)> = None;

        for (idx, free) in self.free_rects.iter().enumerate() {
            for orientation in orientations(panel, self.allow_rotation) {
                let Some((leftover_x, leftover_y)) = leftovers(&orientation, free, self.padding)
                else {
                    continue;
                };
                let score = leftover_x.min(leftover_y);

                let better = match &best {
                    None => true,
                    Some((_, _, best_score)) => score < *best_score,
                };
                if better {
                    best = Some((
                        idx,
                        Placement {
                            id: panel.id.clone(),
                            x: free.x,
                            y: free.y,
                            width: orientation.width,
                            height: orientation.height,
                            rotated: orientation.rotated,
                        },
                        score,
                    ));
                }
            }
        }

        let (idx, placement, _) = best?;
        let host = self.free_rects.remove(idx);
        self.split_free_rect(host, &placement);
        self.packed_rects.push(placement.clone());

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
