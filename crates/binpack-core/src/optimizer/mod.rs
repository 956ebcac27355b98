use crate::packing::{pack_panels_into_bins, pack_panels_with_sheet_limit};
use crate::types::*;
use tracing::info;

mod summary;

pub use summary::summarize;

/// Turns a cut list into sheet layouts.
pub struct Optimizer {
    request: PackRequest,
}

impl Optimizer {
    /// Validates requests and builds a new optimizer instance.
    pub fn new(request: PackRequest) -> Result<Self> {
        if request.panels.is_empty() {
            return Err(PackError::InvalidInput(
                "At least one panel must be provided".to_string(),
            ));
        }

        if !(request.sheet_width > 0.0 && request.sheet_height > 0.0) {
            return Err(PackError::InvalidInput(format!(
                "Sheet size {}x{} must be positive",
                request.sheet_width, request.sheet_height
            )));
        }

        let padding = request.options.padding;
        if !padding.is_finite() || padding < 0.0 {
            return Err(PackError::InvalidInput(format!(
                "Padding must be a non-negative number, got {}",
                padding
            )));
        }

        if request.max_sheets == Some(0) {
            return Err(PackError::InvalidInput(
                "max_sheets must allow at least one sheet".to_string(),
            ));
        }

        for panel in &request.panels {
            if !(panel.width > 0.0 && panel.height > 0.0) {
                return Err(PackError::InvalidInput(format!(
                    "Panel '{}' has non-positive size {}x{}",
                    panel.id, panel.width, panel.height
                )));
            }
        }

        Ok(Self { request })
    }

    /// Expands the cut list, packs it and attaches summary statistics.
    pub fn optimize(&self) -> Optimization {
        let panels = self.expand_panels();
        info!(
            panels = panels.len(),
            algorithm = ?self.request.options.algorithm,
            "packing cut list"
        );

        let (width, height) = (self.request.sheet_width, self.request.sheet_height);
        let options = &self.request.options;
        let result = match self.request.max_sheets {
            Some(max) => {
                pack_panels_with_sheet_limit(&panels, width, height, options, max as usize)
            }
            None => pack_panels_into_bins(&panels, width, height, options),
        };
        let summary = summarize(&result);

        info!(
            sheets = summary.total_sheets,
            unpacked = summary.unpacked_panels,
            waste = summary.waste_percentage,
            "packing complete"
        );

        Optimization {
            sheet_width: self.request.sheet_width,
            sheet_height: self.request.sheet_height,
            options: self.request.options.clone(),
            result,
            summary,
        }
    }

    /// Duplicates panels according to their requested quantity. Grained
    /// panels keep their orientation.
    fn expand_panels(&self) -> Vec<Panel> {
        let mut expanded = Vec::new();
        for spec in &self.request.panels {
            let can_rotate = spec.can_rotate && spec.grain == Grain::None;
            for i in 0..spec.quantity {
                expanded.push(Panel {
                    id: Some(if spec.quantity > 1 {
                        format!("{}_{}", spec.id, i + 1)
                    } else {
                        spec.id.clone()
                    }),
                    width: spec.width,
                    height: spec.height,
                    can_rotate,
                });
            }
        }
        expanded
    }
}
