use std::path::Path;

use image::{Rgba, RgbaImage};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

use super::style::{DotStyle, RenderStyle};
use crate::PixelError;

/// RGBA raster the cells are painted onto.
#[derive(Clone, Debug)]
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Result<Self, PixelError> {
        let pixmap = Pixmap::new(width, height).ok_or(PixelError::InvalidSurface { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Resets every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Straight (non-premultiplied) RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    pub fn to_image(&self) -> RgbaImage {
        let width = self.width();
        let pixels = self.pixmap.pixels();
        RgbaImage::from_fn(width, self.height(), |x, y| {
            let color = pixels[y as usize * width as usize + x as usize].demultiply();
            Rgba([color.red(), color.green(), color.blue(), color.alpha()])
        })
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), PixelError> {
        self.to_image().save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    fn fill_square(&mut self, x: f32, y: f32, size: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, size, size) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = false;
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        self.pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Paints single cells in one [`RenderStyle`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CellPainter {
    style: RenderStyle,
    dot: DotStyle,
}

impl CellPainter {
    pub fn new(style: RenderStyle, dot: DotStyle) -> Self {
        Self { style, dot }
    }

    /// Paints the cell at grid position `(grid_x, grid_y)`; `color` channels are
    /// in `0.0..=255.0`.
    pub fn paint(
        &self,
        surface: &mut Surface,
        grid_x: u32,
        grid_y: u32,
        cell_size: u32,
        color: [f32; 3],
    ) {
        let size = cell_size as f32;
        let x = grid_x as f32 * size;
        let y = grid_y as f32 * size;
        let center = (x + size / 2.0, y + size / 2.0);

        match self.style {
            RenderStyle::FlatSquare => surface.fill_square(x, y, size, solid(color)),
            RenderStyle::SquareWithDot => {
                surface.fill_square(x, y, size, solid(color));

                let mut dot = solid(self.dot.tint(color));
                dot.set_alpha(self.dot.alpha);
                surface.fill_circle(center.0, center.1, self.dot.radius(cell_size), dot);
            },
            RenderStyle::Dot => surface.fill_circle(center.0, center.1, size / 2.0, solid(color)),
        }
    }
}

/// Opaque color with channels rounded to the nearest byte.
fn solid(color: [f32; 3]) -> Color {
    let [r, g, b] = color.map(|channel| channel.clamp(0.0, 255.0).round() as u8);
    Color::from_rgba8(r, g, b, 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted(style: RenderStyle, cell_size: u32, color: [f32; 3]) -> Surface {
        let mut surface = Surface::new(cell_size * 2, cell_size * 2).unwrap();
        CellPainter::new(style, DotStyle::default()).paint(&mut surface, 1, 1, cell_size, color);
        surface
    }

    fn assert_near(actual: [u8; 4], expected: [u8; 4], tolerance: u8) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(a.abs_diff(*e) <= tolerance, "expected {expected:?}, got {actual:?}");
        }
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(matches!(Surface::new(0, 5), Err(PixelError::InvalidSurface { width: 0, height: 5 })));
    }

    #[test]
    fn flat_square_covers_exactly_its_cell() {
        let surface = painted(RenderStyle::FlatSquare, 8, [10.4, 200.6, 30.0]);
        assert_eq!(surface.pixel(8, 8), Some([10, 201, 30, 255]));
        assert_eq!(surface.pixel(15, 15), Some([10, 201, 30, 255]));
        assert_eq!(surface.pixel(7, 8), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(8, 7), Some([0, 0, 0, 0]));
    }

    #[test]
    fn dot_is_blended_over_square() {
        let surface = painted(RenderStyle::SquareWithDot, 16, [100.0, 100.0, 100.0]);

        // Corner keeps the square color, center mixes 90% of the 110 gray dot.
        assert_eq!(surface.pixel(16, 16), Some([100, 100, 100, 255]));
        assert_near(surface.pixel(24, 24).unwrap(), [109, 109, 109, 255], 1);
    }

    #[test]
    fn dot_style_leaves_corners_clear() {
        let surface = painted(RenderStyle::Dot, 16, [0.0, 0.0, 255.0]);
        assert_eq!(surface.pixel(16, 16), Some([0, 0, 0, 0]));
        assert_near(surface.pixel(24, 24).unwrap(), [0, 0, 255, 255], 1);
        assert_eq!(surface.pixel(8, 8), Some([0, 0, 0, 0]));
    }

    #[test]
    fn clear_resets_to_transparent() {
        let mut surface = painted(RenderStyle::FlatSquare, 4, [255.0, 255.0, 255.0]);
        surface.clear();
        assert!(surface.to_image().pixels().all(|pixel| pixel.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn overhanging_cells_are_clipped() {
        let mut surface = Surface::new(10, 10).unwrap();
        let painter = CellPainter::default();
        painter.paint(&mut surface, 1, 1, 8, [255.0, 0.0, 0.0]);
        assert_eq!(surface.pixel(9, 9), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(7, 7), Some([0, 0, 0, 0]));
    }
}
