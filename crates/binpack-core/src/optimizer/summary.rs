use crate::types::{PackResult, Summary};

/// Computes utilization and waste statistics over every sheet of a result.
pub fn summarize(result: &PackResult) -> Summary {
    let total_sheets = result.bins.len() as u32;
    let total_area: f64 = result.bins.iter().map(|b| b.width * b.height).sum();
    let used_area: f64 = result.bins.iter().map(|b| b.used_area).sum();
    let waste_area = total_area - used_area;
    let waste_percentage = if total_area > 0.0 {
        (waste_area / total_area) * 100.0
    } else {
        0.0
    };
    let average_efficiency = if total_sheets > 0 {
        result.bins.iter().map(|b| b.efficiency).sum::<f64>() / total_sheets as f64
    } else {
        0.0
    };
    let placed_panels = result.bins.iter().map(|b| b.rects.len() as u32).sum();

    Summary {
        total_sheets,
        total_area,
        used_area,
        waste_area,
        waste_percentage,
        average_efficiency,
        placed_panels,
        unpacked_panels: result.unpacked.len() as u32,
    }
}
