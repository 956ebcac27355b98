use serde::{Deserialize, Serialize};

/// Axis-aligned region of a sheet. Used for the free space a packer tracks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Panel to be cut - not yet placed on any sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Opaque caller identifier, carried through to the placement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub width: f64,
    pub height: f64,
    /// Panels with a grain direction must keep their orientation
    #[serde(default = "default_true")]
    pub can_rotate: bool,
}

impl Panel {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            id: None,
            width,
            height,
            can_rotate: true,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn locked(mut self) -> Self {
        self.can_rotate = false;
        self
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Panel placed on a sheet.
///
/// `width` and `height` are the dimensions as laid on the sheet, i.e. already
/// swapped when `rotated` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotated: bool,
}

impl Placement {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// One stock sheet and its packing state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub width: f64,
    pub height: f64,
    /// Placements in packing order
    pub rects: Vec<Placement>,
    pub free_rects: Vec<Rect>,
    pub used_area: f64,
    /// Percentage of the sheet covered by placements
    pub efficiency: f64,
}

impl Bin {
    /// Recomputes `used_area` and `efficiency` from the current placements.
    pub fn refresh_stats(&mut self) {
        self.used_area = self.rects.iter().map(Placement::area).sum();
        let total_area = self.width * self.height;
        self.efficiency = if total_area > 0.0 {
            (self.used_area / total_area) * 100.0
        } else {
            0.0
        };
    }
}

/// Single-sheet placement strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Guillotine,
    #[default]
    MaxRects,
}

impl std::str::FromStr for Algorithm {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "guillotine" => Ok(Algorithm::Guillotine),
            "maxrects" => Ok(Algorithm::MaxRects),
            other => Err(PackError::InvalidInput(format!(
                "Unknown algorithm '{}' (expected 'guillotine' or 'maxrects')",
                other
            ))),
        }
    }
}

/// Packing knobs shared by every entry point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackOptions {
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default = "default_true")]
    pub allow_rotation: bool,
    /// Saw kerf added to the footprint of every placed panel
    #[serde(default = "default_padding")]
    pub padding: f64,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            allow_rotation: true,
            padding: DEFAULT_PADDING,
        }
    }
}

/// Typical saw kerf in millimeters
pub const DEFAULT_PADDING: f64 = 3.0;

fn default_true() -> bool {
    true
}

fn default_padding() -> f64 {
    DEFAULT_PADDING
}

/// Output of the multi-sheet driver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackResult {
    pub bins: Vec<Bin>,
    /// Panels that do not fit an empty sheet in any permitted orientation
    #[serde(default)]
    pub unpacked: Vec<Panel>,
}

/// Grain direction of a panel's material
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grain {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Line of a cut list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSpec {
    pub id: String,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_true")]
    pub can_rotate: bool,
    #[serde(default)]
    pub grain: Grain,
}

fn default_quantity() -> u32 {
    1
}

/// Input: What user provides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackRequest {
    pub sheet_width: f64,
    pub sheet_height: f64,
    #[serde(flatten)]
    pub options: PackOptions,
    /// Sheets in stock; panels that would need more end up unpacked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sheets: Option<u32>,
    pub panels: Vec<PanelSpec>,
}

/// Summary statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_sheets: u32,
    pub total_area: f64,
    pub used_area: f64,
    pub waste_area: f64,
    pub waste_percentage: f64,
    pub average_efficiency: f64,
    pub placed_panels: u32,
    pub unpacked_panels: u32,
}

/// Output: What the optimizer returns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Optimization {
    pub sheet_width: f64,
    pub sheet_height: f64,
    pub options: PackOptions,
    #[serde(flatten)]
    pub result: PackResult,
    pub summary: Summary,
}

/// Error type for packing requests
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PackError>;
