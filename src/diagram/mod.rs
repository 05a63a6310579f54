mod compose;
mod config;
mod direction;
mod error;
mod force;
mod placement;
mod resultant;
mod scale;
mod scene;
mod vectors;

pub use compose::{
    DEFAULT_CAPTION, DEFAULT_TITLE, DiagramRequest, LayoutReport, ObjectShape, RenderedDiagram,
    compose_scene,
};
pub use config::{LayoutConfig, OriginMode, UnknownForceStyle};
pub use direction::{heading_unit, unit_vector};
pub use error::LayoutError;
pub use force::{
    Direction, Force, ForceColor, Heading, Magnitude, MagnitudeParseError, UnknownColor,
};
pub use placement::{
    Annotation, MOTION_TEXT, MOTION_TEXT_PT, PlacementGrid, crowding_score, grid_samples,
    place_motion_annotation, quietest_point, quietest_point_where,
};
pub use resultant::{Resultant, compute_resultant};
pub use scale::ScaleContext;
pub use scene::{
    Arrow, BackgroundImage, CHAR_WIDTH_EM, LEGEND_PT, LegendEntry, LegendMetrics, PAGE_WIDTH_PX,
    PX_PER_PT, Primitive, Scene, TextItem, TextRole, font_size_units, legend_rect, text_box,
};
pub use vectors::{
    LaidOutVector, Outline, SkipReason, SkippedForce, VectorLayout, build_vector_layout,
};
