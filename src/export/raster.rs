use std::io::Cursor;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use image::{DynamicImage, ImageFormat, RgbImage};
use resvg::tiny_skia;
use resvg::usvg;

fn rasterize(svg: &str) -> Result<tiny_skia::Pixmap> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    let options = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_str(svg, &options).context("failed to parse generated SVG")?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow!("failed to allocate {}x{} pixmap", size.width(), size.height()))?;

    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}

pub fn svg_to_png(svg: &str) -> Result<Vec<u8>> {
    rasterize(svg)?
        .encode_png()
        .context("failed to encode PNG")
}

/// JPEG has no alpha channel; the white canvas makes every pixel opaque.
pub fn svg_to_jpeg(svg: &str) -> Result<Vec<u8>> {
    let pixmap = rasterize(svg)?;
    let rgb = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue()]
        })
        .collect::<Vec<_>>();
    let buffer = RgbImage::from_raw(pixmap.width(), pixmap.height(), rgb)
        .ok_or_else(|| anyhow!("pixmap size does not match its pixel data"))?;

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .context("failed to encode JPEG")?;
    Ok(bytes)
}
