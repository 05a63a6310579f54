use eframe::egui::{Vec2, vec2};

use super::error::LayoutError;
use super::vectors::VectorLayout;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resultant {
    /// Exact component-wise sum of the scaled displacements.
    pub vector: Vec2,
    pub magnitude: f32,
}

impl Resultant {
    /// Tip used for drawing only; never feeds the reported magnitude.
    pub fn display_vector(&self, bias: f32) -> Vec2 {
        self.vector + vec2(bias, bias)
    }

    /// Magnitude converted back to force units.
    pub fn physical_magnitude(&self, scale_factor: f32) -> f32 {
        self.magnitude / scale_factor
    }
}

pub fn compute_resultant(layout: &VectorLayout) -> Result<Resultant, LayoutError> {
    if layout.is_incomplete() {
        return Err(LayoutError::ResultantUnavailable {
            missing: layout.missing.clone(),
        });
    }

    let vector = layout
        .scaled()
        .fold(Vec2::ZERO, |sum, vector| sum + vector.displacement);
    Ok(Resultant {
        vector,
        magnitude: vector.length(),
    })
}
