mod raster;
mod svg;

use anyhow::Result;

use crate::diagram::Scene;

pub use raster::{svg_to_jpeg, svg_to_png};
pub use svg::scene_to_svg;

pub const DEFAULT_WIDTH_PX: u32 = 800;
pub const DEFAULT_FILE_STEM: &str = "free_body_diagram";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Svg,
    Png,
    #[value(alias = "jpeg")]
    Jpg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
        }
    }

    pub fn default_file_name(self) -> String {
        format!("{DEFAULT_FILE_STEM}.{}", self.extension())
    }
}

pub fn export_scene(scene: &Scene, format: ExportFormat, width_px: u32) -> Result<Vec<u8>> {
    let svg = scene_to_svg(scene, width_px)?;
    match format {
        ExportFormat::Svg => Ok(svg.into_bytes()),
        ExportFormat::Png => svg_to_png(&svg),
        ExportFormat::Jpg => svg_to_jpeg(&svg),
    }
}
