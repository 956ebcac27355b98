//! Sheet packing for CNC cut lists.
//!
//! Lays rectangular panels onto stock sheets using guillotine or MaxRects
//! placement, with a saw kerf added around every panel.
//!
//! ```
//! use binpack_core::{pack_panels_into_bins, PackOptions, Panel};
//!
//! let panels = vec![Panel::new(100.0, 50.0).with_id("shelf")];
//! let result = pack_panels_into_bins(&panels, 200.0, 200.0, &PackOptions::default());
//!
//! assert_eq!(result.bins.len(), 1);
//! assert_eq!(result.bins[0].efficiency, 12.5);
//! ```

pub mod optimizer;
pub mod packing;
pub mod types;
pub mod validate;

pub use optimizer::{summarize, Optimizer};
pub use packing::{
    pack_panels_into_bins, pack_panels_with_sheet_limit, GuillotinePacker, MaxRectsPacker, Packer,
};
pub use types::*;
pub use validate::{validate_bin, validate_result, PlacementIssue, ValidationReport};
