use eframe::egui::{self, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2, vec2};

use crate::diagram::{Arrow, LEGEND_PT, LegendEntry, LegendMetrics, PX_PER_PT, TextItem};

const DASH_PT: f32 = 6.0;
const GAP_PT: f32 = 4.0;

/// Maps scene units (+y up) into a screen rect (+y down), letterboxed.
#[derive(Clone, Copy)]
pub(super) struct SceneTransform {
    scene_center: Pos2,
    screen_center: Pos2,
    zoom: f32,
    pt: f32,
}

impl SceneTransform {
    pub(super) fn fit(scene_bounds: Rect, screen: Rect, reference_width: f32) -> Self {
        let zoom = (screen.width() / scene_bounds.width().max(f32::EPSILON))
            .min(screen.height() / scene_bounds.height().max(f32::EPSILON));
        let drawn_width = scene_bounds.width() * zoom;
        Self {
            scene_center: scene_bounds.center(),
            screen_center: screen.center(),
            zoom,
            pt: PX_PER_PT * (drawn_width / reference_width),
        }
    }

    pub(super) fn world_to_screen(&self, world: Pos2) -> Pos2 {
        let offset = world - self.scene_center;
        self.screen_center + vec2(offset.x, -offset.y) * self.zoom
    }

    pub(super) fn rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_two_pos(self.world_to_screen(rect.min), self.world_to_screen(rect.max))
    }

    pub(super) fn length(&self, length: f32) -> f32 {
        length * self.zoom
    }

    pub(super) fn points(&self, points: f32) -> f32 {
        (points * self.pt).max(0.5)
    }
}

pub(super) fn draw_page(painter: &Painter, screen: Rect, page: Rect) {
    painter.rect_filled(screen, 0.0, Color32::from_rgb(19, 23, 29));
    painter.rect_filled(page, 0.0, Color32::WHITE);
}

fn stroke_segment(
    painter: &Painter,
    start: Pos2,
    end: Pos2,
    stroke: Stroke,
    dashed: bool,
    pt: f32,
) {
    if dashed {
        painter.extend(Shape::dashed_line(&[start, end], stroke, DASH_PT * pt, GAP_PT * pt));
    } else {
        painter.line_segment([start, end], stroke);
    }
}

pub(super) fn draw_arrow(painter: &Painter, transform: &SceneTransform, arrow: &Arrow) {
    let from = transform.world_to_screen(arrow.from);
    let to = transform.world_to_screen(arrow.to);
    let delta: Vec2 = to - from;
    let length = delta.length();
    if length <= f32::EPSILON {
        return;
    }

    let unit = delta / length;
    let base = to - unit * transform.length(arrow.head_length);
    let side = vec2(-unit.y, unit.x) * transform.length(arrow.head_width) * 0.5;
    let stroke = Stroke::new(transform.points(arrow.width_pt), arrow.color);

    stroke_segment(painter, from, base, stroke, arrow.dashed, transform.pt);
    painter.add(Shape::convex_polygon(
        vec![to, base + side, base - side],
        arrow.color,
        Stroke::NONE,
    ));
}

pub(super) fn draw_text(painter: &Painter, transform: &SceneTransform, text: &TextItem) {
    painter.text(
        transform.world_to_screen(text.position),
        egui::Align2::CENTER_BOTTOM,
        &text.text,
        FontId::proportional(transform.points(text.size_pt)),
        text.color,
    );
}

pub(super) fn draw_legend(
    painter: &Painter,
    transform: &SceneTransform,
    legend: &[LegendEntry],
    frame: Rect,
) {
    let LegendMetrics {
        font: font_size,
        row_height,
        swatch,
        padding,
    } = LegendMetrics::new(transform.points(LEGEND_PT));
    let font = FontId::proportional(font_size);

    let frame = transform.rect_to_screen(frame);
    painter.rect_filled(frame, padding * 0.5, Color32::from_rgba_unmultiplied(255, 255, 255, 215));

    for (row, entry) in legend.iter().enumerate() {
        let y = frame.top() + padding + row_height * (row as f32 + 0.5);
        let start = Pos2::new(frame.left() + padding, y);
        let end = Pos2::new(start.x + swatch, y);
        stroke_segment(
            painter,
            start,
            end,
            Stroke::new(transform.points(2.0), entry.color),
            entry.dashed,
            transform.pt,
        );
        painter.text(
            Pos2::new(end.x + padding, y),
            egui::Align2::LEFT_CENTER,
            &entry.label,
            font.clone(),
            Color32::BLACK,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn fit_flips_y_and_keeps_the_aspect_ratio() {
        let scene = Rect::from_min_max(pos2(-2.0, -2.0), pos2(2.0, 2.0));
        let screen = Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 400.0));
        let transform = SceneTransform::fit(scene, screen, 800.0);

        assert_eq!(transform.world_to_screen(pos2(0.0, 0.0)), pos2(400.0, 200.0));
        assert_eq!(transform.world_to_screen(pos2(0.0, 2.0)), pos2(400.0, 0.0));
        assert_eq!(transform.world_to_screen(pos2(-2.0, -2.0)), pos2(200.0, 400.0));
        assert_eq!(transform.length(1.0), 100.0);
    }
}
