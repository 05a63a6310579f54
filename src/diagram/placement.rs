use eframe::egui::{Pos2, Rect, Vec2, pos2};
use tracing::debug;

use super::config::LayoutConfig;
use super::direction::unit_vector;
use super::error::LayoutError;
use super::force::Direction;
use super::scene::text_box;

pub const MOTION_TEXT: &str = "Direction of motion";
pub const MOTION_TEXT_PT: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementGrid {
    pub columns: usize,
    pub rows: usize,
}

impl PlacementGrid {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            columns: config.grid_columns,
            rows: config.grid_rows,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub origin: Pos2,
    pub vector: Vec2,
    pub text: String,
    pub label_anchor: Pos2,
}

fn linspace(min: f32, max: f32, samples: usize, index: usize) -> f32 {
    if samples <= 1 {
        return (min + max) * 0.5;
    }
    min + (max - min) * (index as f32 / (samples - 1) as f32)
}

/// Sum of `exp(-d²)` over every occupied point.
pub fn crowding_score(candidate: Pos2, occupied: &[Pos2]) -> f64 {
    occupied
        .iter()
        .map(|point| {
            let distance_sq = f64::from((candidate - *point).length_sq());
            (-distance_sq).exp()
        })
        .sum()
}

/// Candidate points in row-major order: top row first, left to right.
pub fn grid_samples(region: Rect, grid: PlacementGrid) -> impl Iterator<Item = Pos2> {
    let columns = grid.columns.max(1);
    let rows = grid.rows.max(1);
    (0..rows).flat_map(move |row| {
        let y = linspace(region.max.y, region.min.y, rows, row);
        (0..columns).map(move |column| pos2(linspace(region.min.x, region.max.x, columns, column), y))
    })
}

/// Least crowded grid point. Ties keep the first candidate in scan order, so
/// with nothing occupied the first sample (top-left) is the fixed default.
pub fn quietest_point(occupied: &[Pos2], region: Rect, grid: PlacementGrid) -> Pos2 {
    quietest_point_where(occupied, region, grid, |_| true)
}

/// Like [`quietest_point`], restricted to candidates `admissible` accepts.
/// Falls back to every candidate when none is admissible.
pub fn quietest_point_where(
    occupied: &[Pos2],
    region: Rect,
    grid: PlacementGrid,
    admissible: impl Fn(Pos2) -> bool,
) -> Pos2 {
    let search = |filter: &dyn Fn(Pos2) -> bool| {
        let mut best: Option<(Pos2, f64)> = None;
        for candidate in grid_samples(region, grid).filter(|candidate| filter(*candidate)) {
            let score = crowding_score(candidate, occupied);
            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((candidate, score));
            }
        }
        best
    };

    let (best, score) = search(&admissible)
        .or_else(|| search(&|_| true))
        .unwrap_or((region.center(), 0.0));
    debug!(x = best.x, y = best.y, score, "placement search");
    best
}

impl Annotation {
    pub fn tip(&self) -> Pos2 {
        self.origin + self.vector
    }

    fn centred_at(center: Pos2, unit: Vec2, config: &LayoutConfig) -> Self {
        let vector = unit * config.motion_arrow_length;
        Self {
            origin: center - vector * 0.5,
            vector,
            text: MOTION_TEXT.to_owned(),
            label_anchor: center - Vec2::new(-unit.y, unit.x) * config.label_nudge * 2.0,
        }
    }

    /// Box covering the arrow and its estimated label on a page `page_width`
    /// units wide.
    pub fn footprint(&self, page_width: f32) -> Rect {
        Rect::from_two_pos(self.origin, self.tip()).union(text_box(
            self.label_anchor,
            &self.text,
            MOTION_TEXT_PT,
            page_width,
        ))
    }
}

/// Motion arrow centred on the quietest point of `plot_area`, never
/// overlapping `keep_out` while any candidate allows it.
pub fn place_motion_annotation(
    direction: &Direction,
    occupied: &[Pos2],
    plot_area: Rect,
    keep_out: Option<Rect>,
    config: &LayoutConfig,
) -> Result<Annotation, LayoutError> {
    let unit = unit_vector(direction)?;
    let region = plot_area.shrink(config.motion_arrow_length * 0.5);
    let page_width = plot_area.width();
    let center = quietest_point_where(
        occupied,
        region,
        PlacementGrid::from_config(config),
        |candidate| {
            keep_out.is_none_or(|blocked| {
                !Annotation::centred_at(candidate, unit, config)
                    .footprint(page_width)
                    .intersects(blocked)
            })
        },
    );
    Ok(Annotation::centred_at(center, unit, config))
}
