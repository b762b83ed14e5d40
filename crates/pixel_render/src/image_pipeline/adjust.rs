use crate::color::hsv::{hsv_to_rgb, rgb_to_hsv, Hsv};

/// Mid-gray pivot of the contrast curve.
const CONTRAST_PIVOT: f32 = 128.0;

/// Factors applied to every cell color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorAdjust {
    pub saturation: f32,
    pub contrast: f32,
    /// Hue rotation as a fraction of a full turn.
    pub hue_shift: f32,
}

impl ColorAdjust {
    pub fn transform(&self, rgb: [u8; 3]) -> [f32; 3] {
        let mut hsv = rgb_to_hsv(rgb.map(f32::from));
        hsv = scale_saturation(hsv, self.saturation);
        if self.hue_shift != 0.0 {
            hsv = rotate_hue(hsv, self.hue_shift);
        }

        hsv_to_rgb(hsv).map(|channel| apply_contrast(channel, self.contrast))
    }
}

/// Saturation, then HSV to RGB, then contrast.
pub fn transform_color(rgb: [u8; 3], saturation: f32, contrast: f32) -> [f32; 3] {
    ColorAdjust { saturation, contrast, hue_shift: 0.0 }.transform(rgb)
}

pub fn scale_saturation(hsv: Hsv, factor: f32) -> Hsv {
    Hsv { s: hsv.s * factor, ..hsv }
}

pub fn rotate_hue(hsv: Hsv, turns: f32) -> Hsv {
    Hsv { h: (hsv.h + turns).rem_euclid(1.0), ..hsv }
}

pub fn apply_contrast(value: f32, contrast: f32) -> f32 {
    ((value - CONTRAST_PIVOT) * contrast + CONTRAST_PIVOT).clamp(0.0, 255.0)
}
