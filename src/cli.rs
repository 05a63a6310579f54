use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};
use serde::Deserialize;

use fbd_creator::diagram::{
    BackgroundImage, Direction, DiagramRequest, Force, ForceColor, LayoutConfig, Magnitude,
    ObjectShape, OriginMode, UnknownForceStyle,
};
use fbd_creator::export::{DEFAULT_WIDTH_PX, ExportFormat};

const MAX_BACKGROUND_PX: u32 = 1024;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// JSON diagram description; flags below override its values.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// MAGNITUDE:DIRECTION[:LABEL[:COLOR]], e.g. "50:Up:Normal:Blue" or "?:30deg".
    #[arg(long = "force", value_name = "SPEC")]
    pub forces: Vec<ForceArg>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub caption: Option<String>,
    #[arg(long)]
    pub label_distance: Option<f32>,
    #[arg(long)]
    pub resultant: bool,
    /// Direction of motion: Up/Down/Left/Right or degrees.
    #[arg(long)]
    pub motion: Option<String>,
    #[arg(long, value_enum)]
    pub object: Option<ObjectShape>,
    #[arg(long)]
    pub background: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub origin: Option<OriginMode>,
    #[arg(long, value_enum)]
    pub unknown: Option<UnknownForceStyle>,
    #[arg(long, value_enum, default_value_t = ExportFormat::Svg)]
    pub format: ExportFormat,
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_WIDTH_PX)]
    pub width: u32,
    /// Open a window instead of writing a file.
    #[arg(long)]
    pub preview: bool,
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Debug)]
pub struct ForceArg(pub Force);

impl FromStr for ForceArg {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.splitn(4, ':');
        let magnitude = parts
            .next()
            .unwrap_or_default()
            .parse::<Magnitude>()
            .map_err(|error| error.to_string())?;
        let direction = match parts.next() {
            Some(direction) if !direction.trim().is_empty() => direction
                .parse::<Direction>()
                .map_err(|error| error.to_string())?,
            _ => return Err(format!("force {raw:?} is missing a direction")),
        };
        let label = parts.next().unwrap_or_default().trim().to_owned();
        let color = match parts.next() {
            Some(color) => color.parse::<ForceColor>().map_err(|error| error.to_string())?,
            None => ForceColor::default(),
        };
        Ok(Self(Force::new(magnitude, direction, label, color)))
    }
}

#[derive(Debug, Default, Deserialize)]
struct DiagramFile {
    #[serde(flatten)]
    request: DiagramRequest,
    #[serde(default)]
    layout: LayoutConfig,
}

fn read_diagram_file(path: &Path) -> Result<DiagramFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read diagram file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid diagram JSON in {}", path.display()))
}

pub fn load_background(path: &Path) -> Result<BackgroundImage> {
    let mut decoder = ImageReader::open(path)
        .with_context(|| format!("failed to open background image {}", path.display()))?
        .with_guessed_format()
        .context("failed to detect background image format")?
        .into_decoder()
        .context("unsupported background image format")?;
    let orientation = decoder
        .orientation()
        .context("failed to read background image orientation")?;
    let mut image =
        DynamicImage::from_decoder(decoder).context("failed to decode background image")?;
    image.apply_orientation(orientation);

    if image.width().max(image.height()) > MAX_BACKGROUND_PX {
        image = image.resize(MAX_BACKGROUND_PX, MAX_BACKGROUND_PX, FilterType::Triangle);
    }

    let rgba = image.to_rgba8();
    Ok(BackgroundImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

impl Args {
    pub fn diagram(&self) -> Result<(DiagramRequest, LayoutConfig)> {
        let DiagramFile {
            mut request,
            mut layout,
        } = match &self.input {
            Some(path) => read_diagram_file(path)?,
            None => DiagramFile::default(),
        };

        if !self.forces.is_empty() {
            request.forces = self.forces.iter().map(|force| force.0.clone()).collect();
        }
        if let Some(title) = &self.title {
            request.title = title.clone();
        }
        if let Some(caption) = &self.caption {
            request.caption = caption.clone();
        }
        if self.resultant {
            request.show_resultant = true;
        }
        if let Some(motion) = &self.motion {
            request.motion = Some(motion.parse::<Direction>()?);
        }
        if let Some(object) = self.object {
            request.object = object;
        }
        if let Some(label_distance) = self.label_distance {
            layout.label_distance = label_distance;
        }
        if let Some(origin) = self.origin {
            layout.origin_mode = origin;
        }
        if let Some(unknown) = self.unknown {
            layout.unknown_style = unknown;
        }

        if request.forces.is_empty() {
            bail!("no forces given; pass --input <file> or at least one --force");
        }

        match (&self.background, request.object) {
            (Some(path), _) => {
                request.background = Some(Arc::new(load_background(path)?));
                if self.object.is_none() {
                    request.object = ObjectShape::Image;
                }
            }
            (None, ObjectShape::Image) => {
                bail!("--object image needs --background <image>");
            }
            (None, _) => {}
        }

        Ok((request, layout))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.format.default_file_name()))
    }
}
