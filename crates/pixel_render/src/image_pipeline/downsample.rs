use image::imageops::{self, FilterType};
use image::{Rgba, Rgba32FImage, RgbaImage};

use super::resize::GridGeometry;
use crate::cells::grid::ColorGrid;

/// Interpolation used when shrinking the source to one pixel per cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResampleFilter {
    /// Point sampling, hard-edged blocks.
    Nearest,
    /// Bilinear, close to a browser's smoothed image draw.
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Shrinks the whole source image to `columns x rows` and reads back one RGB
/// triple per cell.
///
/// Resampling runs on premultiplied color, so transparent source pixels
/// contribute nothing and a fully transparent cell reads back as black. Alpha
/// is dropped afterwards.
pub fn downsample(source: &RgbaImage, geometry: GridGeometry, filter: ResampleFilter) -> ColorGrid {
    let premultiplied = Rgba32FImage::from_fn(source.width(), source.height(), |x, y| {
        let [r, g, b, a] = source.get_pixel(x, y).0.map(|channel| f32::from(channel) / 255.0);
        Rgba([r * a, g * a, b * a, a])
    });
    let resized = imageops::resize(&premultiplied, geometry.columns, geometry.rows, filter.into());

    let cells = resized.pixels().map(|pixel| demultiply(pixel.0)).collect();
    ColorGrid::new(geometry.columns, geometry.rows, cells)
}

fn demultiply([r, g, b, a]: [f32; 4]) -> [u8; 3] {
    if a <= 0.0 {
        return [0, 0, 0];
    }
    [r, g, b].map(|channel| ((channel / a).clamp(0.0, 1.0) * 255.0).round() as u8)
}
