use super::{GuillotinePacker, MaxRectsPacker, Packer};
use crate::types::{Algorithm, Bin, PackOptions, PackResult, Panel};
use tracing::{debug, warn};

/// Sheet opened by the driver together with the panels it holds, in the
/// order they were packed. The layout is always rederived from `members`.
struct OpenBin {
    members: Vec<Panel>,
    bin: Bin,
}

/// Packs `panels` onto as many `bin_width` x `bin_height` sheets as needed.
///
/// Panels are placed largest area first. Each panel is offered to the open
/// sheets in creation order by replaying the sheet's panels through a fresh
/// packer and then trying the new one; a new sheet is opened only when every
/// open sheet refuses. Panels that an empty sheet cannot hold end up in
/// [`PackResult::unpacked`].
pub fn pack_panels_into_bins(
    panels: &[Panel],
    bin_width: f64,
    bin_height: f64,
    options: &PackOptions,
) -> PackResult {
    pack_dispatch(panels, bin_width, bin_height, options, None)
}

/// Same as [`pack_panels_into_bins`] but never opens more than `max_sheets`
/// sheets. Panels that would need another sheet are reported as unpacked.
pub fn pack_panels_with_sheet_limit(
    panels: &[Panel],
    bin_width: f64,
    bin_height: f64,
    options: &PackOptions,
    max_sheets: usize,
) -> PackResult {
    pack_dispatch(panels, bin_width, bin_height, options, Some(max_sheets))
}

fn pack_dispatch(
    panels: &[Panel],
    bin_width: f64,
    bin_height: f64,
    options: &PackOptions,
    max_sheets: Option<usize>,
) -> PackResult {
    match options.algorithm {
        Algorithm::Guillotine => {
            pack_with::<GuillotinePacker>(panels, bin_width, bin_height, options, max_sheets)
        }
        Algorithm::MaxRects => {
            pack_with::<MaxRectsPacker>(panels, bin_width, bin_height, options, max_sheets)
        }
    }
}

fn pack_with<P: Packer>(
    panels: &[Panel],
    bin_width: f64,
    bin_height: f64,
    options: &PackOptions,
    max_sheets: Option<usize>,
) -> PackResult {
    let new_packer = || P::new(bin_width, bin_height, options.allow_rotation, options.padding);

    // total_cmp keeps the order total even for NaN areas
    let mut sorted: Vec<&Panel> = panels.iter().collect();
    sorted.sort_by(|a, b| b.area().total_cmp(&a.area()));

    let mut open: Vec<OpenBin> = Vec::new();
    let mut unpacked = Vec::new();

    for panel in sorted {
        let mut placed = false;

        for (bin_idx, open_bin) in open.iter_mut().enumerate() {
            let mut packer = new_packer();
            if !open_bin.members.iter().all(|m| packer.pack(m).is_some()) {
                warn!(bin = bin_idx, "replay of existing panels failed, skipping sheet");
                continue;
            }

            if packer.pack(panel).is_some() {
                open_bin.members.push(panel.clone());
                open_bin.bin = packer.result();
                debug!(bin = bin_idx, id = ?panel.id, "placed panel on open sheet");
                placed = true;
                break;
            }
        }

        if placed {
            continue;
        }

        if max_sheets.is_some_and(|max| open.len() >= max) {
            debug!(id = ?panel.id, "sheet limit reached");
            unpacked.push(panel.clone());
            continue;
        }

        let mut packer = new_packer();
        if packer.pack(panel).is_some() {
            debug!(bin = open.len(), id = ?panel.id, "opened new sheet");
            open.push(OpenBin {
                members: vec![panel.clone()],
                bin: packer.result(),
            });
        } else {
            warn!(
                id = ?panel.id,
                width = panel.width,
                height = panel.height,
                "panel does not fit an empty sheet"
            );
            unpacked.push(panel.clone());
        }
    }

    let bins = open
        .into_iter()
        .map(|open_bin| {
            let mut bin = open_bin.bin;
            bin.refresh_stats();
            bin
        })
        .collect();

    PackResult { bins, unpacked }
}
