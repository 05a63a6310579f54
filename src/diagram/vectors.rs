use eframe::egui::{Pos2, Vec2, vec2};
use tracing::warn;

use super::config::{LayoutConfig, OriginMode, UnknownForceStyle};
use super::direction::unit_vector;
use super::error::LayoutError;
use super::force::{Force, ForceColor, Magnitude};
use super::scale::ScaleContext;

#[derive(Clone, Debug, PartialEq)]
pub struct LaidOutVector {
    pub index: usize,
    pub origin: Pos2,
    pub tip: Pos2,
    pub displacement: Vec2,
    pub label_anchor: Pos2,
    pub label: String,
    pub color: ForceColor,
    /// Drawn at a fixed length because the magnitude is unknown.
    pub symbolic: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    UnknownMagnitude,
    NonPositiveMagnitude(f32),
    Direction(LayoutError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkippedForce {
    pub index: usize,
    pub label: String,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorLayout {
    pub vectors: Vec<LaidOutVector>,
    pub skipped: Vec<SkippedForce>,
    /// Forces without a scaled vector, drawn symbolically or not at all.
    pub missing: Vec<usize>,
}

impl VectorLayout {
    pub fn is_incomplete(&self) -> bool {
        !self.missing.is_empty()
    }

    pub fn scaled(&self) -> impl Iterator<Item = &LaidOutVector> {
        self.vectors.iter().filter(|vector| !vector.symbolic)
    }
}

pub fn label_anchor(tip: Pos2, displacement: Vec2, unit: Vec2, config: &LayoutConfig) -> Pos2 {
    let perpendicular = vec2(-unit.y, unit.x);
    tip + displacement * config.label_distance + perpendicular * config.label_nudge
}

/// Shape of the drawn object as seen by arrows leaving it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outline {
    /// Squares and circles: the same half-size in every direction.
    Uniform(f32),
    /// Images: a box with these half-sides.
    Box(Vec2),
}

impl Outline {
    /// Distance from the centre to the outline along `unit`.
    pub fn reach(self, unit: Vec2) -> f32 {
        match self {
            Self::Uniform(half) => half,
            Self::Box(half) => {
                let (ux, uy) = (unit.x.abs(), unit.y.abs());
                let edge = [(ux, half.x), (uy, half.y)]
                    .into_iter()
                    .filter(|(component, _)| *component > f32::EPSILON)
                    .map(|(component, side)| side / component)
                    .fold(f32::INFINITY, f32::min);
                (ux * half.x + uy * half.y).min(edge)
            }
        }
    }
}

pub fn arrow_origin(unit: Vec2, outline: Outline, mode: OriginMode) -> Pos2 {
    match mode {
        OriginMode::Center => Pos2::ZERO,
        OriginMode::Boundary => Pos2::ZERO + unit * outline.reach(unit),
    }
}

pub fn build_vector_layout(
    forces: &[Force],
    scale: &ScaleContext,
    outline: Outline,
    config: &LayoutConfig,
) -> VectorLayout {
    let mut layout = VectorLayout::default();

    for (index, force) in forces.iter().enumerate() {
        let label = force.display_label(index);

        let unit = match unit_vector(&force.direction) {
            Ok(unit) => unit,
            Err(error) => {
                warn!(force = index + 1, label = %label, %error, "skipping force");
                layout.missing.push(index);
                layout.skipped.push(SkippedForce {
                    index,
                    label,
                    reason: SkipReason::Direction(error),
                });
                continue;
            }
        };

        let (length, symbolic) = match (force.magnitude.usable(), force.magnitude) {
            (Some(value), _) => (value * scale.scale_factor, false),
            (None, Magnitude::Unknown) if config.unknown_style == UnknownForceStyle::Symbolic => {
                layout.missing.push(index);
                (config.symbolic_length, true)
            }
            (None, magnitude) => {
                let reason = match magnitude {
                    Magnitude::Known(value) => SkipReason::NonPositiveMagnitude(value),
                    Magnitude::Unknown => SkipReason::UnknownMagnitude,
                };
                warn!(force = index + 1, label = %label, ?reason, "force has no drawable magnitude");
                layout.missing.push(index);
                layout.skipped.push(SkippedForce { index, label, reason });
                continue;
            }
        };

        let displacement = unit * length;
        let origin = arrow_origin(unit, outline, config.origin_mode);
        let tip = origin + displacement;
        layout.vectors.push(LaidOutVector {
            index,
            origin,
            tip,
            displacement,
            label_anchor: label_anchor(tip, displacement, unit, config),
            label,
            color: force.color,
            symbolic,
        });
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::force::{Direction, Heading};
    use proptest::prelude::*;

    fn scale_for(forces: &[Force], config: &LayoutConfig) -> ScaleContext {
        let magnitudes = forces.iter().map(|force| force.magnitude).collect::<Vec<_>>();
        ScaleContext::from_magnitudes(&magnitudes, config)
    }

    #[test]
    fn displacement_is_magnitude_times_scale_along_the_direction() {
        let config = LayoutConfig::default();
        let forces = vec![
            Force::known(50.0, Heading::Up, "Normal"),
            Force::known(25.0, Heading::Left, "Push"),
        ];
        let scale = scale_for(&forces, &config);
        let layout = build_vector_layout(&forces, &scale, Outline::Uniform(0.5), &config);

        assert_eq!(layout.vectors.len(), 2);
        assert_eq!(layout.vectors[0].origin, Pos2::ZERO);
        assert_eq!(layout.vectors[0].displacement, vec2(0.0, 50.0 * scale.scale_factor));
        assert_eq!(layout.vectors[1].displacement, vec2(-25.0 * scale.scale_factor, 0.0));
        assert!(!layout.is_incomplete());
    }

    #[test]
    fn labels_sit_past_the_tip_with_a_perpendicular_nudge() {
        let config = LayoutConfig::default();
        let forces = vec![Force::known(10.0, Heading::Right, "F")];
        let scale = scale_for(&forces, &config);
        let layout = build_vector_layout(&forces, &scale, Outline::Uniform(0.5), &config);
        let vector = &layout.vectors[0];

        let expected_x = 2.0 * (1.0 + config.label_distance);
        assert!((vector.label_anchor.x - expected_x).abs() < 1e-6);
        assert!((vector.label_anchor.y - config.label_nudge).abs() < 1e-6);
    }

    #[test]
    fn boundary_mode_starts_arrows_on_the_object_outline() {
        let config = LayoutConfig {
            origin_mode: OriginMode::Boundary,
            ..LayoutConfig::default()
        };
        let forces = vec![Force::known(10.0, Heading::Down, "Weight")];
        let scale = scale_for(&forces, &config);
        let layout = build_vector_layout(&forces, &scale, Outline::Uniform(0.75), &config);
        let vector = &layout.vectors[0];

        assert_eq!(vector.origin, Pos2::new(0.0, -0.75));
        assert_eq!(vector.tip, Pos2::new(0.0, -2.75));
    }

    #[test]
    fn unusable_forces_are_skipped_and_recorded() {
        let config = LayoutConfig::default();
        let forces = vec![
            Force::known(10.0, Heading::Up, "A"),
            Force::unknown(Heading::Right, "B"),
            Force::known(-3.0, Heading::Left, "C"),
            Force::new(
                Magnitude::Known(4.0),
                Direction::Token("Sideways".to_owned()),
                "D",
                ForceColor::Blue,
            ),
        ];
        let scale = scale_for(&forces, &config);
        let layout = build_vector_layout(&forces, &scale, Outline::Uniform(0.5), &config);

        assert_eq!(layout.vectors.len(), 1);
        assert_eq!(layout.missing, vec![1, 2, 3]);
        assert_eq!(layout.skipped[0].reason, SkipReason::UnknownMagnitude);
        assert_eq!(layout.skipped[1].reason, SkipReason::NonPositiveMagnitude(-3.0));
        assert!(matches!(
            layout.skipped[2].reason,
            SkipReason::Direction(LayoutError::InvalidDirection { .. })
        ));
    }

    #[test]
    fn symbolic_mode_draws_unknown_forces_at_fixed_length() {
        let config = LayoutConfig {
            unknown_style: UnknownForceStyle::Symbolic,
            ..LayoutConfig::default()
        };
        let forces = vec![Force::unknown(Heading::Left, "Drag")];
        let scale = scale_for(&forces, &config);
        let layout = build_vector_layout(&forces, &scale, Outline::Uniform(0.5), &config);

        assert_eq!(layout.vectors.len(), 1);
        assert!(layout.vectors[0].symbolic);
        assert_eq!(layout.vectors[0].displacement, vec2(-config.symbolic_length, 0.0));
        assert!(layout.is_incomplete());
        assert_eq!(layout.scaled().count(), 0);
    }

    #[test]
    fn box_outlines_reach_the_edge_along_each_direction() {
        let wide = Outline::Box(vec2(1.0, 0.5));
        assert!((wide.reach(vec2(1.0, 0.0)) - 1.0).abs() < 1e-6);
        assert!((wide.reach(vec2(0.0, -1.0)) - 0.5).abs() < 1e-6);

        let diagonal = vec2(1.0, 1.0).normalized();
        assert!((wide.reach(diagonal) - 0.5 * 2.0_f32.sqrt()).abs() < 1e-5);
        assert_eq!(Outline::Uniform(0.7).reach(diagonal), 0.7);
    }

    #[test]
    fn boundary_mode_on_a_wide_image_starts_vertical_arrows_at_its_edge() {
        let config = LayoutConfig {
            origin_mode: OriginMode::Boundary,
            ..LayoutConfig::default()
        };
        let forces = vec![
            Force::known(10.0, Heading::Up, "Lift"),
            Force::known(10.0, Heading::Left, "Drag"),
        ];
        let scale = scale_for(&forces, &config);
        let outline = Outline::Box(vec2(0.6, 0.3));
        let layout = build_vector_layout(&forces, &scale, outline, &config);

        assert_eq!(layout.vectors[0].origin, Pos2::new(0.0, 0.3));
        assert_eq!(layout.vectors[1].origin, Pos2::new(-0.6, 0.0));
    }

    fn heading() -> impl Strategy<Value = Heading> {
        prop::sample::select(Heading::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_symbolic_headings_stay_axis_aligned(
            entries in prop::collection::vec((0.1f32..500.0, heading()), 1..10),
            boundary in any::<bool>(),
            symbolic in any::<bool>(),
        ) {
            let config = LayoutConfig {
                origin_mode: if boundary { OriginMode::Boundary } else { OriginMode::Center },
                unknown_style: if symbolic { UnknownForceStyle::Symbolic } else { UnknownForceStyle::Omit },
                ..LayoutConfig::default()
            };
            let forces = entries
                .iter()
                .map(|(value, heading)| Force::known(*value, *heading, "F"))
                .collect::<Vec<_>>();
            let scale = scale_for(&forces, &config);
            let layout = build_vector_layout(&forces, &scale, Outline::Uniform(0.4), &config);

            prop_assert_eq!(layout.vectors.len(), forces.len());
            for vector in &layout.vectors {
                prop_assert!(vector.displacement.x == 0.0 || vector.displacement.y == 0.0);
            }
        }
    }
}
