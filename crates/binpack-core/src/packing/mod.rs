//! Rectangle packing onto stock sheets.
//!
//! Two single-sheet packers share the [`Packer`] contract:
//! [`GuillotinePacker`] splits free space into disjoint remainders, while
//! [`MaxRectsPacker`] keeps overlapping maximal free rects for denser layouts.
//! [`pack_panels_into_bins`] spreads a whole cut list over as many sheets as
//! it needs.

use crate::types::{Bin, Panel, Placement};

mod geometry;
mod guillotine;
mod maxrects;
mod multi_bin;

pub use guillotine::GuillotinePacker;
pub use maxrects::MaxRectsPacker;
pub use multi_bin::{pack_panels_into_bins, pack_panels_with_sheet_limit};

/// Placement engine for exactly one sheet.
pub trait Packer {
    /// Empty sheet of `width` x `height`. `padding` is added to the right and
    /// top of every placed panel.
    fn new(width: f64, height: f64, allow_rotation: bool, padding: f64) -> Self
    where
        Self: Sized;

    /// Places `panel`, or returns `None` when no free rect can hold it in
    /// any permitted orientation. The sheet is left untouched on `None`.
    fn pack(&mut self, panel: &Panel) -> Option<Placement>;

    /// Snapshot of the sheet with freshly computed area statistics.
    fn result(&self) -> Bin;
}
