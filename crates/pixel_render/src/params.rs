use std::fmt;

use crate::image_pipeline::adjust::ColorAdjust;
use crate::PixelError;

/// User-controlled render parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParams {
    /// Side length of one cell on the surface, in pixels.
    pub cell_size: u32,
    /// 0.0 collapses to mid-gray, 1.0 leaves colors unchanged.
    pub contrast: f32,
    /// 0.0 is grayscale, 1.0 leaves colors unchanged. Not clamped above 1.0.
    pub saturation: f32,
    /// Hue rotation as a fraction of a full turn.
    pub hue_shift: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self { cell_size: 10, contrast: 1.0, saturation: 1.0, hue_shift: 0.0 }
    }
}

impl RenderParams {
    /// Builds parameters from slider-style percentages (100 = unchanged).
    pub fn from_percentages(cell_size: u32, contrast_pct: f32, saturation_pct: f32) -> Self {
        Self {
            cell_size,
            contrast: contrast_pct / 100.0,
            saturation: saturation_pct / 100.0,
            hue_shift: 0.0,
        }
    }

    pub fn with_hue_degrees(mut self, degrees: f32) -> Self {
        self.hue_shift = degrees / 360.0;
        self
    }

    pub fn validate(&self) -> Result<(), PixelError> {
        if self.cell_size == 0 {
            return Err(PixelError::InvalidParameter("cell size must be at least 1".into()));
        }

        for (name, value) in
            [("contrast", self.contrast), ("saturation", self.saturation), ("hue shift", self.hue_shift)]
        {
            if !value.is_finite() {
                return Err(PixelError::InvalidParameter(format!("{name} must be finite")));
            }
        }

        Ok(())
    }

    pub fn color_adjust(&self) -> ColorAdjust {
        ColorAdjust {
            saturation: self.saturation,
            contrast: self.contrast,
            hue_shift: self.hue_shift,
        }
    }

    /// Text shown next to each control.
    pub fn readouts(&self) -> Readouts {
        Readouts {
            cell_size: self.cell_size.to_string(),
            contrast: format!("{}%", percent(self.contrast)),
            saturation: format!("{}%", percent(self.saturation)),
        }
    }
}

fn percent(factor: f32) -> f32 {
    (factor * 100.0 * 1000.0).round() / 1000.0
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Readouts {
    pub cell_size: String,
    pub contrast: String,
    pub saturation: String,
}

impl fmt::Display for Readouts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell {}  contrast {}  saturation {}", self.cell_size, self.contrast, self.saturation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_become_factors() {
        let params = RenderParams::from_percentages(12, 150.0, 0.0);
        assert_eq!(params.cell_size, 12);
        assert_eq!(params.contrast, 1.5);
        assert_eq!(params.saturation, 0.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero = RenderParams { cell_size: 0, ..RenderParams::default() };
        assert!(matches!(zero.validate(), Err(PixelError::InvalidParameter(_))));

        let nan = RenderParams { contrast: f32::NAN, ..RenderParams::default() };
        assert!(nan.validate().is_err());

        // Saturation above 100% stays legal.
        assert!(RenderParams::from_percentages(4, 100.0, 200.0).validate().is_ok());
    }

    #[test]
    fn negative_factors_are_left_to_the_clamp() {
        let negative = RenderParams::from_percentages(4, -50.0, -10.0);
        assert!(negative.validate().is_ok());

        let out = negative.color_adjust().transform([255, 255, 255]);
        assert_eq!(out, [64.5; 3]);
    }

    #[test]
    fn readouts_mirror_controls() {
        let readouts = RenderParams::from_percentages(10, 120.0, 35.0).readouts();
        assert_eq!(readouts.cell_size, "10");
        assert_eq!(readouts.contrast, "120%");
        assert_eq!(readouts.saturation, "35%");
    }

    #[test]
    fn hue_degrees_are_stored_as_turns() {
        let params = RenderParams::default().with_hue_degrees(90.0);
        assert_eq!(params.hue_shift, 0.25);
    }
}
