use super::config::LayoutConfig;
use super::force::Magnitude;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleContext {
    pub scale_factor: f32,
    /// In force units; multiply by `scale_factor` for scene units.
    pub reference_size: f32,
    pub degenerate: bool,
}

impl ScaleContext {
    pub fn from_magnitudes(magnitudes: &[Magnitude], config: &LayoutConfig) -> Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for value in magnitudes.iter().filter_map(|magnitude| magnitude.usable()) {
            min = min.min(value);
            max = max.max(value);
        }

        if !max.is_finite() {
            return Self {
                scale_factor: 1.0,
                reference_size: config.fallback_reference_size,
                degenerate: true,
            };
        }

        Self {
            scale_factor: config.scale_constant / max,
            reference_size: min / 2.0,
            degenerate: false,
        }
    }

    /// Side of the drawn object (or diameter of the circle) in scene units.
    pub fn object_size(&self, config: &LayoutConfig) -> f32 {
        self.reference_size * self.scale_factor * config.object_size_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(values: &[f32]) -> Vec<Magnitude> {
        values.iter().copied().map(Magnitude::Known).collect()
    }

    #[test]
    fn scale_normalises_to_the_largest_magnitude() {
        let scale = ScaleContext::from_magnitudes(&known(&[5.0, 10.0]), &LayoutConfig::default());
        assert_eq!(scale.scale_factor, 2.0 / 10.0);
        assert_eq!(scale.reference_size, 2.5);
        assert!(!scale.degenerate);
    }

    #[test]
    fn no_known_magnitude_falls_back_to_neutral_values() {
        let config = LayoutConfig::default();
        let scale = ScaleContext::from_magnitudes(&[], &config);
        assert_eq!(scale.scale_factor, 1.0);
        assert_eq!(scale.reference_size, config.fallback_reference_size);
        assert!(scale.degenerate);

        let scale = ScaleContext::from_magnitudes(
            &[Magnitude::Unknown, Magnitude::Known(0.0), Magnitude::Known(-4.0)],
            &config,
        );
        assert_eq!(scale.scale_factor, 1.0);
        assert!(scale.degenerate);
    }

    #[test]
    fn unknown_magnitudes_never_feed_the_reference_size() {
        let mut magnitudes = known(&[40.0]);
        magnitudes.push(Magnitude::Unknown);
        let scale = ScaleContext::from_magnitudes(&magnitudes, &LayoutConfig::default());
        assert_eq!(scale.reference_size, 20.0);
    }

    #[test]
    fn single_magnitude_still_yields_a_visible_object() {
        let config = LayoutConfig::default();
        let scale = ScaleContext::from_magnitudes(&known(&[10.0]), &config);
        assert_eq!(scale.scale_factor, 0.2);
        assert!(scale.object_size(&config) > 0.0);
        assert!((scale.object_size(&config) - 1.5).abs() < 1e-6);
    }
}
