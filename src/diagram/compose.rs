use std::sync::Arc;

use eframe::egui::{Color32, Pos2, Rect, Vec2, pos2, vec2};
use serde::Deserialize;
use tracing::{debug, warn};

use super::config::LayoutConfig;
use super::direction::unit_vector;
use super::error::LayoutError;
use super::force::{Direction, Force};
use super::placement::{Annotation, MOTION_TEXT, MOTION_TEXT_PT, place_motion_annotation};
use super::resultant::{Resultant, compute_resultant};
use super::scale::ScaleContext;
use super::scene::{
    Arrow, BackgroundImage, CHAR_WIDTH_EM, LegendEntry, Primitive, Scene, TextItem, TextRole,
    font_size_units, legend_rect,
};
use super::vectors::{
    LaidOutVector, Outline, SkipReason, SkippedForce, arrow_origin, build_vector_layout,
    label_anchor,
};
use crate::util::format_magnitude;

pub const DEFAULT_TITLE: &str = "Free Body Diagram";
pub const DEFAULT_CAPTION: &str = "Generated using the Free Body Diagram Creator.";

const OBJECT_COLOR: Color32 = Color32::BLACK;
const RESULTANT_COLOR: Color32 = Color32::from_rgb(0x80, 0x00, 0x80);
const ANNOTATION_COLOR: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);
const CAPTION_COLOR: Color32 = Color32::from_rgb(0x80, 0x80, 0x80);
const OBJECT_STROKE_PT: f32 = 4.0;
const FORCE_STROKE_PT: f32 = 2.0;
const RESULTANT_STROKE_PT: f32 = 3.0;
const LABEL_PT: f32 = 12.0;
const TITLE_PT: f32 = 14.0;
const CAPTION_PT: f32 = 10.0;
const TITLE_BAND: f32 = 0.6;
const CAPTION_BAND: f32 = 0.5;
const MIN_DRAWN_LENGTH: f32 = 1e-6;
/// Largest share of the half-page a single label may claim when sizing the view.
const MAX_TEXT_SHARE: f32 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ObjectShape {
    #[default]
    Rectangle,
    Circle,
    Image,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiagramRequest {
    pub title: String,
    pub caption: String,
    pub forces: Vec<Force>,
    pub show_resultant: bool,
    pub motion: Option<Direction>,
    pub object: ObjectShape,
    #[serde(skip)]
    pub background: Option<Arc<BackgroundImage>>,
}

impl Default for DiagramRequest {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            caption: DEFAULT_CAPTION.to_owned(),
            forces: Vec::new(),
            show_resultant: false,
            motion: None,
            object: ObjectShape::default(),
            background: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutReport {
    pub scale: ScaleContext,
    pub skipped: Vec<SkippedForce>,
    /// `None` when no resultant was requested.
    pub resultant: Option<Result<Resultant, LayoutError>>,
    /// `None` when no motion annotation was requested.
    pub annotation: Option<Result<Annotation, LayoutError>>,
}

impl LayoutReport {
    /// Every diagram-level condition and per-force direction failure, once each.
    pub fn warnings(&self) -> Vec<LayoutError> {
        let mut warnings = Vec::new();
        if self.scale.degenerate {
            warnings.push(LayoutError::DegenerateScale);
        }
        for skipped in &self.skipped {
            if let SkipReason::Direction(error) = &skipped.reason {
                warnings.push(error.clone());
            }
        }
        if let Some(Err(error)) = &self.resultant {
            warnings.push(error.clone());
        }
        if let Some(Err(error)) = &self.annotation {
            warnings.push(error.clone());
        }
        warnings
    }

    /// Conditions that concern the whole diagram rather than one force.
    pub fn diagram_conditions(&self) -> Vec<LayoutError> {
        self.warnings()
            .into_iter()
            .filter(|warning| !matches!(warning, LayoutError::InvalidDirection { .. }))
            .collect()
    }

    pub fn resultant_unavailable(&self) -> bool {
        matches!(self.resultant, Some(Err(_)))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedDiagram {
    pub scene: Scene,
    pub report: LayoutReport,
}

enum ObjectPrimitive {
    Rectangle { half: f32 },
    Circle { radius: f32 },
    Image { rect: Rect, image: Arc<BackgroundImage> },
}

impl ObjectPrimitive {
    fn outline(&self) -> Outline {
        match self {
            Self::Rectangle { half } => Outline::Uniform(*half),
            Self::Circle { radius } => Outline::Uniform(*radius),
            Self::Image { rect, .. } => Outline::Box(rect.size() * 0.5),
        }
    }

    fn bounding_half(&self) -> Vec2 {
        match self {
            Self::Rectangle { half } => vec2(*half, *half),
            Self::Circle { radius } => vec2(*radius, *radius),
            Self::Image { rect, .. } => rect.size() * 0.5,
        }
    }

    fn into_primitive(self) -> Primitive {
        match self {
            Self::Rectangle { half } => Primitive::Rectangle {
                rect: Rect::from_center_size(Pos2::ZERO, vec2(half, half) * 2.0),
                color: OBJECT_COLOR,
                stroke_pt: OBJECT_STROKE_PT,
            },
            Self::Circle { radius } => Primitive::Circle {
                center: Pos2::ZERO,
                radius,
                color: OBJECT_COLOR,
                stroke_pt: OBJECT_STROKE_PT,
            },
            Self::Image { rect, image } => Primitive::Image { rect, image },
        }
    }
}

fn object_primitive(
    request: &DiagramRequest,
    scale: &ScaleContext,
    config: &LayoutConfig,
) -> ObjectPrimitive {
    let half = scale.object_size(config) * 0.5;
    match (request.object, &request.background) {
        (ObjectShape::Rectangle, _) => ObjectPrimitive::Rectangle { half },
        (ObjectShape::Circle, _) => ObjectPrimitive::Circle { radius: half },
        (ObjectShape::Image, Some(image)) if image.width > 0 && image.height > 0 => {
            let aspect = image.width as f32 / image.height as f32;
            let size = if aspect >= 1.0 {
                vec2(config.image_extent, config.image_extent / aspect)
            } else {
                vec2(config.image_extent * aspect, config.image_extent)
            };
            ObjectPrimitive::Image {
                rect: Rect::from_center_size(Pos2::ZERO, size),
                image: Arc::clone(image),
            }
        }
        (ObjectShape::Image, _) => {
            warn!("image object requested without a usable background image; drawing a rectangle");
            ObjectPrimitive::Rectangle { half }
        }
    }
}

fn arrow(
    from: Pos2,
    to: Pos2,
    color: Color32,
    width_pt: f32,
    dashed: bool,
    config: &LayoutConfig,
) -> Arrow {
    let length = (to - from).length();
    let head_length = config.head_length.min(length * 0.4);
    let head_width = if config.head_length > 0.0 {
        config.head_width * (head_length / config.head_length)
    } else {
        0.0
    };
    Arrow {
        from,
        to,
        color,
        width_pt,
        dashed,
        head_length,
        head_width,
    }
}

fn label(position: Pos2, text: String, color: Color32, role: TextRole) -> TextItem {
    TextItem {
        position,
        text,
        color,
        size_pt: LABEL_PT,
        bold: true,
        role,
    }
}

struct ResultantDrawing {
    arrow: Option<Arrow>,
    label: TextItem,
}

fn resultant_drawing(
    resultant: &Resultant,
    scale: &ScaleContext,
    outline: Outline,
    config: &LayoutConfig,
) -> ResultantDrawing {
    let display = resultant.display_vector(config.resultant_bias);
    let text = format!(
        "Resultant ({})",
        format_magnitude(resultant.physical_magnitude(scale.scale_factor))
    );

    if display.length() < MIN_DRAWN_LENGTH {
        let below = outline.reach(vec2(0.0, -1.0));
        let position = pos2(0.0, -(below + config.label_nudge * 3.0));
        return ResultantDrawing {
            arrow: None,
            label: label(position, text, RESULTANT_COLOR, TextRole::ResultantLabel),
        };
    }

    let unit = display.normalized();
    let origin = arrow_origin(unit, outline, config.origin_mode);
    let tip = origin + display;
    ResultantDrawing {
        arrow: Some(arrow(origin, tip, RESULTANT_COLOR, RESULTANT_STROKE_PT, true, config)),
        label: label(
            label_anchor(tip, display, unit, config),
            text,
            RESULTANT_COLOR,
            TextRole::ResultantLabel,
        ),
    }
}

fn max_abs_coordinate(points: impl IntoIterator<Item = Pos2>) -> f32 {
    points
        .into_iter()
        .map(|point| point.x.abs().max(point.y.abs()))
        .filter(|value| value.is_finite())
        .fold(0.0, f32::max)
}

/// Half-extent that keeps `text` on a page `2 * extent` units wide, given
/// that text scales with the page.
fn text_extent(text: &TextItem, margin: f32) -> f32 {
    let font_per_unit = font_size_units(text.size_pt, 2.0);
    let chars = text.text.chars().count() as f32;
    let width_share = (chars * CHAR_WIDTH_EM * font_per_unit * 0.5).min(MAX_TEXT_SHARE);
    let height_share = font_per_unit.min(MAX_TEXT_SHARE);
    let x = (text.position.x.abs() + margin) / (1.0 - width_share);
    let y = (text.position.y.abs() + margin) / (1.0 - height_share);
    x.max(y)
}

fn vector_label(vector: &LaidOutVector) -> TextItem {
    label(
        vector.label_anchor,
        vector.label.clone(),
        vector.color.color32(),
        TextRole::ForceLabel,
    )
}

fn vector_primitives(vector: &LaidOutVector, config: &LayoutConfig) -> [Primitive; 2] {
    let color = vector.color.color32();
    [
        Primitive::Arrow(arrow(
            vector.origin,
            vector.tip,
            color,
            FORCE_STROKE_PT,
            vector.symbolic,
            config,
        )),
        Primitive::Text(vector_label(vector)),
    ]
}

/// Lays out one diagram. Never fails: per-force problems skip that force and
/// diagram-level conditions are recorded in the report.
pub fn compose_scene(request: &DiagramRequest, config: &LayoutConfig) -> RenderedDiagram {
    let magnitudes = request
        .forces
        .iter()
        .map(|force| force.magnitude)
        .collect::<Vec<_>>();
    let scale = ScaleContext::from_magnitudes(&magnitudes, config);
    debug!(
        scale_factor = scale.scale_factor,
        reference_size = scale.reference_size,
        degenerate = scale.degenerate,
        "scale context"
    );

    let object = object_primitive(request, &scale, config);
    let outline = object.outline();
    let layout = build_vector_layout(&request.forces, &scale, outline, config);

    let resultant = request.show_resultant.then(|| compute_resultant(&layout));
    if let Some(Err(error)) = &resultant {
        debug!(%error, "resultant skipped");
    }
    let resultant_drawing = match &resultant {
        Some(Ok(resultant)) => Some(resultant_drawing(resultant, &scale, outline, config)),
        _ => None,
    };

    let object_corner = object.bounding_half();
    let mut extent_points = vec![object_corner.to_pos2()];
    let mut labels = Vec::with_capacity(layout.vectors.len() + 1);
    for vector in &layout.vectors {
        extent_points.extend([vector.origin, vector.tip]);
        labels.push(vector_label(vector));
    }
    if let Some(drawing) = &resultant_drawing {
        labels.push(drawing.label.clone());
        if let Some(arrow) = &drawing.arrow {
            extent_points.extend([arrow.from, arrow.to]);
        }
    }
    let extent = labels
        .iter()
        .map(|text| text_extent(text, config.view_margin))
        .filter(|value| value.is_finite())
        .fold(
            config
                .base_extent
                .max(max_abs_coordinate(extent_points) + config.view_margin),
            f32::max,
        );
    let plot_area = Rect::from_center_size(Pos2::ZERO, Vec2::splat(extent * 2.0));

    let mut legend = layout
        .vectors
        .iter()
        .map(|vector| LegendEntry {
            label: vector.label.clone(),
            color: vector.color.color32(),
            dashed: vector.symbolic,
        })
        .collect::<Vec<_>>();
    if resultant_drawing
        .as_ref()
        .is_some_and(|drawing| drawing.arrow.is_some())
    {
        legend.push(LegendEntry {
            label: "Resultant".to_owned(),
            color: RESULTANT_COLOR,
            dashed: true,
        });
    }
    if request
        .motion
        .as_ref()
        .is_some_and(|direction| unit_vector(direction).is_ok())
    {
        legend.push(LegendEntry {
            label: MOTION_TEXT.to_owned(),
            color: ANNOTATION_COLOR,
            dashed: false,
        });
    }
    let legend_rect = legend_rect(&legend, plot_area);

    let annotation = request.motion.as_ref().map(|direction| {
        let mut occupied = layout.vectors.iter().map(|vector| vector.tip).collect::<Vec<_>>();
        if let Some(arrow) = resultant_drawing.as_ref().and_then(|drawing| drawing.arrow.as_ref()) {
            occupied.push(arrow.to);
        }
        place_motion_annotation(direction, &occupied, plot_area, legend_rect, config)
    });
    if let Some(Err(error)) = &annotation {
        debug!(%error, "motion annotation skipped");
    }

    let mut primitives = Vec::with_capacity(layout.vectors.len() * 2 + 7);
    primitives.push(object.into_primitive());

    for vector in &layout.vectors {
        primitives.extend(vector_primitives(vector, config));
    }

    if let Some(drawing) = resultant_drawing {
        if let Some(arrow) = drawing.arrow {
            primitives.push(Primitive::Arrow(arrow));
        }
        primitives.push(Primitive::Text(drawing.label));
    }

    if let Some(Ok(annotation)) = &annotation {
        primitives.push(Primitive::Arrow(arrow(
            annotation.origin,
            annotation.tip(),
            ANNOTATION_COLOR,
            FORCE_STROKE_PT,
            false,
            config,
        )));
        primitives.push(Primitive::Text(TextItem {
            size_pt: MOTION_TEXT_PT,
            bold: false,
            ..label(
                annotation.label_anchor,
                annotation.text.clone(),
                ANNOTATION_COLOR,
                TextRole::AnnotationLabel,
            )
        }));
    }

    primitives.push(Primitive::Text(TextItem {
        position: pos2(0.0, extent + TITLE_BAND * 0.5),
        text: request.title.clone(),
        color: Color32::BLACK,
        size_pt: TITLE_PT,
        bold: true,
        role: TextRole::Title,
    }));
    primitives.push(Primitive::Text(TextItem {
        position: pos2(0.0, -extent - CAPTION_BAND * 0.5),
        text: request.caption.clone(),
        color: CAPTION_COLOR,
        size_pt: CAPTION_PT,
        bold: false,
        role: TextRole::Caption,
    }));

    let bounds = Rect::from_min_max(
        pos2(-extent, -extent - CAPTION_BAND),
        pos2(extent, extent + TITLE_BAND),
    );

    RenderedDiagram {
        scene: Scene {
            bounds,
            plot_area,
            primitives,
            legend,
            legend_rect,
        },
        report: LayoutReport {
            scale,
            skipped: layout.skipped,
            resultant,
            annotation,
        },
    }
}
