use serde::Deserialize;

/// Longest known force is drawn this many scene units long.
pub const DEFAULT_SCALE_CONSTANT: f32 = 2.0;
/// Reference size used when no magnitude is known.
pub const DEFAULT_FALLBACK_REFERENCE_SIZE: f32 = 0.5;
pub const DEFAULT_OBJECT_SIZE_FACTOR: f32 = 1.5;
pub const DEFAULT_LABEL_DISTANCE: f32 = 0.3;
pub const DEFAULT_LABEL_NUDGE: f32 = 0.08;
/// Added to both components of the drawn resultant tip only.
pub const DEFAULT_RESULTANT_BIAS: f32 = 0.3;
pub const DEFAULT_GRID_SAMPLES: usize = 10;
pub const DEFAULT_BASE_EXTENT: f32 = 2.0;
pub const DEFAULT_VIEW_MARGIN: f32 = 0.5;
pub const DEFAULT_MOTION_ARROW_LENGTH: f32 = 0.8;
pub const DEFAULT_SYMBOLIC_LENGTH: f32 = 1.0;
pub const DEFAULT_IMAGE_EXTENT: f32 = 1.2;
pub const DEFAULT_HEAD_LENGTH: f32 = 0.12;
pub const DEFAULT_HEAD_WIDTH: f32 = 0.08;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OriginMode {
    /// Arrows start at the object's centre.
    #[default]
    Center,
    /// Arrows start on the object's outline along their own direction.
    Boundary,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnknownForceStyle {
    #[default]
    Omit,
    /// Fixed-length dashed arrow; still excluded from the resultant.
    Symbolic,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub scale_constant: f32,
    pub fallback_reference_size: f32,
    pub object_size_factor: f32,
    pub label_distance: f32,
    pub label_nudge: f32,
    pub resultant_bias: f32,
    pub grid_columns: usize,
    pub grid_rows: usize,
    pub base_extent: f32,
    pub view_margin: f32,
    pub motion_arrow_length: f32,
    pub symbolic_length: f32,
    pub image_extent: f32,
    pub head_length: f32,
    pub head_width: f32,
    pub origin_mode: OriginMode,
    pub unknown_style: UnknownForceStyle,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale_constant: DEFAULT_SCALE_CONSTANT,
            fallback_reference_size: DEFAULT_FALLBACK_REFERENCE_SIZE,
            object_size_factor: DEFAULT_OBJECT_SIZE_FACTOR,
            label_distance: DEFAULT_LABEL_DISTANCE,
            label_nudge: DEFAULT_LABEL_NUDGE,
            resultant_bias: DEFAULT_RESULTANT_BIAS,
            grid_columns: DEFAULT_GRID_SAMPLES,
            grid_rows: DEFAULT_GRID_SAMPLES,
            base_extent: DEFAULT_BASE_EXTENT,
            view_margin: DEFAULT_VIEW_MARGIN,
            motion_arrow_length: DEFAULT_MOTION_ARROW_LENGTH,
            symbolic_length: DEFAULT_SYMBOLIC_LENGTH,
            image_extent: DEFAULT_IMAGE_EXTENT,
            head_length: DEFAULT_HEAD_LENGTH,
            head_width: DEFAULT_HEAD_WIDTH,
            origin_mode: OriginMode::default(),
            unknown_style: UnknownForceStyle::default(),
        }
    }
}
