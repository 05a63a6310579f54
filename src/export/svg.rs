use std::fmt::Write as _;
use std::io::Cursor;

use anyhow::{Context, Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use eframe::egui::{Color32, Pos2, Rect, pos2, vec2};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::diagram::{
    Arrow, BackgroundImage, LEGEND_PT, LegendEntry, LegendMetrics, PAGE_WIDTH_PX, PX_PER_PT,
    Primitive, Scene, TextItem,
};

const FONT_FAMILY: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";
const DASH_PATTERN_PT: [f32; 2] = [6.0, 4.0];

struct Viewport {
    bounds: Rect,
    width_px: u32,
    pixels_per_unit: f32,
    pt: f32,
}

impl Viewport {
    fn new(bounds: Rect, width_px: u32) -> Self {
        let width_px = width_px.max(1);
        let width = width_px as f32;
        Self {
            bounds,
            width_px,
            pixels_per_unit: width / bounds.width().max(f32::EPSILON),
            pt: PX_PER_PT * (width / PAGE_WIDTH_PX),
        }
    }

    fn height_px(&self) -> u32 {
        (self.bounds.height() * self.pixels_per_unit).ceil().max(1.0) as u32
    }

    fn to_px(&self, point: Pos2) -> Pos2 {
        pos2(
            (point.x - self.bounds.min.x) * self.pixels_per_unit,
            (self.bounds.max.y - point.y) * self.pixels_per_unit,
        )
    }

    fn rect_to_px(&self, rect: Rect) -> Rect {
        Rect::from_two_pos(self.to_px(rect.min), self.to_px(rect.max))
    }
}

fn color(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn dash_attr(dashed: bool, view: &Viewport) -> String {
    if dashed {
        format!(
            r#" stroke-dasharray="{:.2} {:.2}""#,
            DASH_PATTERN_PT[0] * view.pt,
            DASH_PATTERN_PT[1] * view.pt
        )
    } else {
        String::new()
    }
}

fn write_arrow(out: &mut String, arrow: &Arrow, view: &Viewport) {
    let from = view.to_px(arrow.from);
    let to = view.to_px(arrow.to);
    let delta = to - from;
    let length = delta.length();
    if length <= f32::EPSILON {
        return;
    }

    let unit = delta / length;
    let head_length = arrow.head_length * view.pixels_per_unit;
    let half_width = arrow.head_width * view.pixels_per_unit * 0.5;
    let base = to - unit * head_length;
    let side = vec2(-unit.y, unit.x) * half_width;
    let stroke = color(arrow.color);

    let _ = writeln!(
        out,
        r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{stroke}" stroke-width="{:.2}" stroke-linecap="round"{}/>"#,
        from.x,
        from.y,
        base.x,
        base.y,
        arrow.width_pt * view.pt,
        dash_attr(arrow.dashed, view),
    );
    let left = base + side;
    let right = base - side;
    let _ = writeln!(
        out,
        r#"  <polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{stroke}"/>"#,
        to.x, to.y, left.x, left.y, right.x, right.y,
    );
}

fn write_text(out: &mut String, text: &TextItem, view: &Viewport) {
    let position = view.to_px(text.position);
    let weight = if text.bold { "bold" } else { "normal" };
    let _ = writeln!(
        out,
        r#"  <text x="{:.2}" y="{:.2}" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="{:.2}" font-weight="{weight}" fill="{}">{}</text>"#,
        position.x,
        position.y,
        text.size_pt * view.pt,
        color(text.color),
        escape(&text.text),
    );
}

fn png_data_uri(image: &BackgroundImage) -> Result<String> {
    let buffer = RgbaImage::from_raw(image.width, image.height, image.rgba.clone())
        .ok_or_else(|| {
            anyhow!(
                "background pixel buffer does not match {}x{}",
                image.width,
                image.height
            )
        })?;
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("failed to encode background image as PNG")?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
}

fn write_legend(out: &mut String, legend: &[LegendEntry], frame: Rect, view: &Viewport) {
    let LegendMetrics {
        font: font_px,
        row_height,
        swatch,
        padding,
    } = LegendMetrics::new(LEGEND_PT * view.pt);
    let frame = view.rect_to_px(frame);
    let (left, top) = (frame.left(), frame.top());
    let _ = writeln!(
        out,
        r##"  <rect x="{left:.2}" y="{top:.2}" width="{:.2}" height="{:.2}" rx="{:.2}" fill="#ffffff" fill-opacity="0.85" stroke="#cccccc"/>"##,
        frame.width(),
        frame.height(),
        padding * 0.5,
    );

    for (row, entry) in legend.iter().enumerate() {
        let center_y = top + padding + row_height * (row as f32 + 0.5);
        let stroke = color(entry.color);
        let _ = writeln!(
            out,
            r#"  <line x1="{:.2}" y1="{center_y:.2}" x2="{:.2}" y2="{center_y:.2}" stroke="{stroke}" stroke-width="{:.2}"{}/>"#,
            left + padding,
            left + padding + swatch,
            2.0 * view.pt,
            dash_attr(entry.dashed, view),
        );
        let _ = writeln!(
            out,
            r##"  <text x="{:.2}" y="{:.2}" font-family="{FONT_FAMILY}" font-size="{font_px:.2}" fill="#000000">{}</text>"##,
            left + padding * 2.0 + swatch,
            center_y + font_px * 0.35,
            escape(&entry.label),
        );
    }
}

/// Standalone SVG document for a scene, `width_px` wide.
pub fn scene_to_svg(scene: &Scene, width_px: u32) -> Result<String> {
    let view = Viewport::new(scene.bounds, width_px);
    let (width, height) = (view.width_px, view.height_px());
    let mut out = String::new();

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#,
    );
    let _ = writeln!(out, r#"  <rect width="100%" height="100%" fill="white"/>"#);

    for primitive in &scene.primitives {
        match primitive {
            Primitive::Rectangle {
                rect,
                color: stroke,
                stroke_pt,
            } => {
                let rect = view.rect_to_px(*rect);
                let _ = writeln!(
                    out,
                    r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="{}" stroke-width="{:.2}"/>"#,
                    rect.min.x,
                    rect.min.y,
                    rect.width(),
                    rect.height(),
                    color(*stroke),
                    stroke_pt * view.pt,
                );
            }
            Primitive::Circle {
                center,
                radius,
                color: stroke,
                stroke_pt,
            } => {
                let center = view.to_px(*center);
                let _ = writeln!(
                    out,
                    r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" stroke="{}" stroke-width="{:.2}"/>"#,
                    center.x,
                    center.y,
                    radius * view.pixels_per_unit,
                    color(*stroke),
                    stroke_pt * view.pt,
                );
            }
            Primitive::Image { rect, image } => {
                let rect = view.rect_to_px(*rect);
                let _ = writeln!(
                    out,
                    r#"  <image x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" preserveAspectRatio="none" xlink:href="{}"/>"#,
                    rect.min.x,
                    rect.min.y,
                    rect.width(),
                    rect.height(),
                    png_data_uri(image)?,
                );
            }
            Primitive::Arrow(arrow) => write_arrow(&mut out, arrow, &view),
            Primitive::Text(text) => write_text(&mut out, text, &view),
        }
    }

    if let Some(frame) = scene.legend_rect {
        write_legend(&mut out, &scene.legend, frame, &view);
    }
    out.push_str("</svg>\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{
        DiagramRequest, Force, Heading, LayoutConfig, ObjectShape, compose_scene,
    };
    use std::sync::Arc;

    fn scene(request: DiagramRequest) -> Scene {
        compose_scene(&request, &LayoutConfig::default()).scene
    }

    #[test]
    fn document_has_requested_width_and_flipped_y() {
        let scene = scene(DiagramRequest {
            forces: vec![Force::known(10.0, Heading::Up, "Lift")],
            ..DiagramRequest::default()
        });
        let svg = scene_to_svg(&scene, 640).unwrap();

        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"width="640""#));
        assert!(svg.trim_end().ends_with("</svg>"));

        let view = Viewport::new(scene.bounds, 640);
        let origin = view.to_px(Pos2::ZERO);
        let tip = view.to_px(pos2(0.0, 2.0));
        assert!(tip.y < origin.y);
    }

    #[test]
    fn labels_are_escaped() {
        let svg = scene_to_svg(
            &scene(DiagramRequest {
                title: "F < G & \"H\"".to_owned(),
                forces: vec![Force::known(10.0, Heading::Up, "<Lift>")],
                ..DiagramRequest::default()
            }),
            400,
        )
        .unwrap();

        assert!(svg.contains("F &lt; G &amp; &quot;H&quot;"));
        assert!(svg.contains("&lt;Lift&gt;"));
        assert!(!svg.contains("<Lift>"));
    }

    #[test]
    fn dashed_arrows_and_legend_rows() {
        let svg = scene_to_svg(
            &scene(DiagramRequest {
                forces: vec![
                    Force::known(10.0, Heading::Up, "A"),
                    Force::known(10.0, Heading::Right, "B"),
                ],
                show_resultant: true,
                ..DiagramRequest::default()
            }),
            800,
        )
        .unwrap();

        assert_eq!(svg.matches("<polygon").count(), 3);
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains(">Resultant</text>"));
    }

    #[test]
    fn legend_frame_follows_the_scene_rect() {
        let scene = scene(DiagramRequest {
            forces: vec![Force::known(10.0, Heading::Up, "A")],
            ..DiagramRequest::default()
        });
        let frame = scene.legend_rect.unwrap();
        let view = Viewport::new(scene.bounds, 800);
        let top_left = view.to_px(pos2(frame.min.x, frame.max.y));
        let svg = scene_to_svg(&scene, 800).unwrap();

        assert!(svg.contains(&format!(r#"<rect x="{:.2}" y="{:.2}""#, top_left.x, top_left.y)));
    }

    #[test]
    fn background_images_are_embedded_as_png() {
        let svg = scene_to_svg(
            &scene(DiagramRequest {
                forces: vec![Force::known(10.0, Heading::Up, "A")],
                object: ObjectShape::Image,
                background: Some(Arc::new(BackgroundImage {
                    width: 2,
                    height: 2,
                    rgba: vec![200; 16],
                })),
                ..DiagramRequest::default()
            }),
            400,
        )
        .unwrap();

        assert!(svg.contains("data:image/png;base64,"));
    }

    #[test]
    fn mismatched_pixel_buffers_are_rejected() {
        let image = BackgroundImage {
            width: 4,
            height: 4,
            rgba: vec![0; 3],
        };
        assert!(png_data_uri(&image).is_err());
    }
}
