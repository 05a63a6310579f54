mod render_utils;

use eframe::egui::{self, Color32, ColorImage, Context, Rect, Sense, TextureHandle, pos2};
use tracing::warn;

use crate::diagram::{BackgroundImage, LayoutError, PAGE_WIDTH_PX, Primitive, RenderedDiagram};
use render_utils::{SceneTransform, draw_arrow, draw_legend, draw_page, draw_text};

/// `None` (with a warning) when the buffer does not hold `width * height` pixels.
fn background_pixels(image: &BackgroundImage) -> Option<ColorImage> {
    let size = [image.width as usize, image.height as usize];
    if image.rgba.len() != size[0] * size[1] * 4 {
        warn!(
            width = image.width,
            height = image.height,
            bytes = image.rgba.len(),
            "background pixel buffer has the wrong size; not drawing it"
        );
        return None;
    }
    Some(ColorImage::from_rgba_unmultiplied(size, &image.rgba))
}

#[derive(Clone)]
enum TextureSlot {
    Pending,
    Loaded(TextureHandle),
    Unusable,
}

pub struct PreviewApp {
    rendered: RenderedDiagram,
    warnings: Vec<LayoutError>,
    textures: Vec<TextureSlot>,
}

impl PreviewApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, rendered: RenderedDiagram) -> Self {
        let warnings = rendered.report.warnings();
        let textures = vec![TextureSlot::Pending; rendered.scene.primitives.len()];
        Self {
            rendered,
            warnings,
            textures,
        }
    }

    fn texture_for(&mut self, ctx: &Context, index: usize) -> Option<TextureHandle> {
        match self.textures.get(index) {
            Some(TextureSlot::Loaded(texture)) => return Some(texture.clone()),
            Some(TextureSlot::Unusable) | None => return None,
            Some(TextureSlot::Pending) => {}
        }

        let Some(Primitive::Image { image, .. }) = self.rendered.scene.primitives.get(index) else {
            return None;
        };
        let texture = background_pixels(image).map(|pixels| {
            ctx.load_texture(
                format!("fbd-background-{index}"),
                pixels,
                egui::TextureOptions::LINEAR,
            )
        });
        if let Some(slot) = self.textures.get_mut(index) {
            *slot = match &texture {
                Some(texture) => TextureSlot::Loaded(texture.clone()),
                None => TextureSlot::Unusable,
            };
        }
        texture
    }

    fn draw_scene(&mut self, ui: &mut egui::Ui) {
        let (screen, _response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let painter = ui.painter_at(screen);
        let scene_bounds = self.rendered.scene.bounds;
        let transform = SceneTransform::fit(scene_bounds, screen, PAGE_WIDTH_PX);
        draw_page(&painter, screen, transform.rect_to_screen(scene_bounds));

        for index in 0..self.rendered.scene.primitives.len() {
            let texture = self.texture_for(ui.ctx(), index);
            match &self.rendered.scene.primitives[index] {
                Primitive::Rectangle {
                    rect,
                    color,
                    stroke_pt,
                } => {
                    painter.rect_stroke(
                        transform.rect_to_screen(*rect),
                        0.0,
                        egui::Stroke::new(transform.points(*stroke_pt), *color),
                        egui::StrokeKind::Middle,
                    );
                }
                Primitive::Circle {
                    center,
                    radius,
                    color,
                    stroke_pt,
                } => {
                    painter.circle_stroke(
                        transform.world_to_screen(*center),
                        transform.length(*radius),
                        egui::Stroke::new(transform.points(*stroke_pt), *color),
                    );
                }
                Primitive::Image { rect, .. } => {
                    if let Some(texture) = texture {
                        painter.image(
                            texture.id(),
                            transform.rect_to_screen(*rect),
                            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                            Color32::WHITE,
                        );
                    }
                }
                Primitive::Arrow(arrow) => draw_arrow(&painter, &transform, arrow),
                Primitive::Text(text) => draw_text(&painter, &transform, text),
            }
        }

        if let Some(frame) = self.rendered.scene.legend_rect {
            draw_legend(&painter, &transform, &self.rendered.scene.legend, frame);
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if !self.warnings.is_empty() {
            egui::TopBottomPanel::bottom("warnings").show(ctx, |ui| {
                for warning in &self.warnings {
                    ui.colored_label(Color32::from_rgb(230, 160, 60), warning.to_string());
                }
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_scene(ui);
        });
    }
}

pub fn run_preview(rendered: RenderedDiagram) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 820.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Free Body Diagram",
        options,
        Box::new(move |cc| Ok(Box::new(PreviewApp::new(cc, rendered)))),
    )
}
