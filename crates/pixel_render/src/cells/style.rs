/// Shape painted for every cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderStyle {
    /// Solid square filling the cell.
    #[default]
    FlatSquare,
    /// Solid square with a brighter, translucent dot in its center.
    SquareWithDot,
    /// Circle inscribed in the cell, nothing behind it.
    Dot,
}

/// Appearance of the dot painted by [`RenderStyle::SquareWithDot`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotStyle {
    /// Dot diameter relative to the cell size.
    pub diameter_ratio: f32,
    /// Multiplier applied to each channel of the cell color.
    pub brighten: f32,
    pub alpha: f32,
}

impl Default for DotStyle {
    fn default() -> Self {
        Self { diameter_ratio: 0.625, brighten: 1.1, alpha: 0.9 }
    }
}

impl DotStyle {
    pub fn radius(&self, cell_size: u32) -> f32 {
        cell_size as f32 * self.diameter_ratio / 2.0
    }

    /// Brightened dot color, saturating at 255.
    pub fn tint(&self, color: [f32; 3]) -> [f32; 3] {
        color.map(|channel| (channel * self.brighten).clamp(0.0, 255.0))
    }
}
