use std::sync::Arc;

use eframe::egui::{Color32, Pos2, Rect, Vec2, pos2, vec2};

/// Text sizes are points on a page this many pixels wide.
pub const PAGE_WIDTH_PX: f32 = 800.0;
pub const PX_PER_PT: f32 = 4.0 / 3.0;
/// Average glyph advance as a fraction of the font size.
pub const CHAR_WIDTH_EM: f32 = 0.6;
pub const LEGEND_PT: f32 = 10.0;

/// Font size in scene units when `page_width` scene units span the page.
pub fn font_size_units(size_pt: f32, page_width: f32) -> f32 {
    size_pt * PX_PER_PT * page_width / PAGE_WIDTH_PX
}

/// Estimated box of baseline-centred text.
pub fn text_box(position: Pos2, text: &str, size_pt: f32, page_width: f32) -> Rect {
    let font = font_size_units(size_pt, page_width);
    let half_width = text.chars().count() as f32 * CHAR_WIDTH_EM * font * 0.5;
    Rect::from_min_max(
        pos2(position.x - half_width, position.y - font * 0.2),
        pos2(position.x + half_width, position.y + font),
    )
}

/// Decoded, orientation-corrected pixels ready to draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackgroundImage {
    pub width: u32,
    pub height: u32,
    /// Unpremultiplied RGBA8, row-major.
    pub rgba: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arrow {
    pub from: Pos2,
    pub to: Pos2,
    pub color: Color32,
    pub width_pt: f32,
    pub dashed: bool,
    pub head_length: f32,
    pub head_width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Caption,
    ForceLabel,
    ResultantLabel,
    AnnotationLabel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    /// Centre of the text's baseline.
    pub position: Pos2,
    pub text: String,
    pub color: Color32,
    pub size_pt: f32,
    pub bold: bool,
    pub role: TextRole,
}

impl TextItem {
    pub fn extent(&self, page_width: f32) -> Rect {
        text_box(self.position, &self.text, self.size_pt, page_width)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Rectangle {
        rect: Rect,
        color: Color32,
        stroke_pt: f32,
    },
    Circle {
        center: Pos2,
        radius: f32,
        color: Color32,
        stroke_pt: f32,
    },
    Image {
        rect: Rect,
        image: Arc<BackgroundImage>,
    },
    Arrow(Arrow),
    Text(TextItem),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color32,
    pub dashed: bool,
}

/// Legend box metrics, all in the same unit as `font`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegendMetrics {
    pub font: f32,
    pub row_height: f32,
    pub swatch: f32,
    pub padding: f32,
}

impl LegendMetrics {
    pub fn new(font: f32) -> Self {
        Self {
            font,
            row_height: font * 1.6,
            swatch: font * 2.0,
            padding: font * 0.6,
        }
    }

    pub fn size(&self, legend: &[LegendEntry]) -> Vec2 {
        let widest = legend
            .iter()
            .map(|entry| entry.label.chars().count())
            .max()
            .unwrap_or(0) as f32;
        vec2(
            self.padding * 3.0 + self.swatch + widest * self.font * CHAR_WIDTH_EM,
            self.padding * 2.0 + self.row_height * legend.len() as f32,
        )
    }
}

/// Legend box in scene units, tucked into the lower-right corner of
/// `plot_area`. `None` for an empty legend.
pub fn legend_rect(legend: &[LegendEntry], plot_area: Rect) -> Option<Rect> {
    if legend.is_empty() {
        return None;
    }
    let metrics = LegendMetrics::new(font_size_units(LEGEND_PT, plot_area.width()));
    let size = metrics.size(legend);
    Some(Rect::from_min_size(
        pos2(
            plot_area.max.x - size.x - metrics.padding,
            plot_area.min.y + metrics.padding,
        ),
        size,
    ))
}

/// One laid-out diagram in scene units (+y up). Primitives are in draw order.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub bounds: Rect,
    pub plot_area: Rect,
    pub primitives: Vec<Primitive>,
    pub legend: Vec<LegendEntry>,
    /// Where the legend is drawn; exporters lay its rows out inside it.
    pub legend_rect: Option<Rect>,
}

impl Scene {
    pub fn arrows(&self) -> impl Iterator<Item = &Arrow> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Arrow(arrow) => Some(arrow),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextItem> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn text_with_role(&self, role: TextRole) -> Option<&TextItem> {
        self.texts().find(|text| text.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_boxes_grow_with_the_page() {
        let narrow = text_box(Pos2::ZERO, "Weight", 12.0, 4.0);
        let wide = text_box(Pos2::ZERO, "Weight", 12.0, 8.0);
        assert!((wide.width() - narrow.width() * 2.0).abs() < 1e-6);
        assert!((narrow.center().x).abs() < 1e-6);
        assert!(narrow.max.y > 0.0 && narrow.min.y < 0.0);
    }

    #[test]
    fn legend_sits_in_the_lower_right_of_the_plot() {
        let plot_area = Rect::from_min_max(pos2(-3.0, -3.0), pos2(3.0, 3.0));
        let legend = [LegendEntry {
            label: "Normal".to_owned(),
            color: Color32::RED,
            dashed: false,
        }];
        let rect = legend_rect(&legend, plot_area).unwrap();

        assert!(plot_area.contains_rect(rect));
        assert!(rect.center().x > 0.0 && rect.center().y < 0.0);
        assert_eq!(legend_rect(&[], plot_area), None);
    }
}
