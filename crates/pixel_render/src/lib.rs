mod cells;
mod color;
mod image_pipeline;
mod params;
mod session;

use log::debug;

pub use cells::{
    grid::ColorGrid,
    paint::{CellPainter, Surface},
    style::{DotStyle, RenderStyle},
};
pub use color::hsv::{hsv_to_rgb, rgb_to_hsv, Hsv};
pub use image_pipeline::{
    adjust::{apply_contrast, transform_color, ColorAdjust},
    downsample::{downsample, ResampleFilter},
    loader::{load_frames, SourceFrame, SourceImage, DEFAULT_FRAME_DELAY},
    resize::{GridGeometry, SizingPolicy, DEFAULT_SURFACE_WIDTH},
};
pub use params::{Readouts, RenderParams};
pub use session::PreviewSession;

#[derive(Debug, thiserror::Error)]
pub enum PixelError {
    #[error("failed to process image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("image has no pixels")]
    EmptyImage,
    #[error("unsupported surface dimensions {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    pub style: RenderStyle,
    pub filter: ResampleFilter,
    /// Dot appearance for [`RenderStyle::SquareWithDot`].
    pub dot: DotStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSummary {
    pub geometry: GridGeometry,
    /// Number of cells painted.
    pub cells: usize,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PixelRenderer {
    options: RenderOptions,
}

impl PixelRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Repaints `surface` from scratch with the pixelated `image`.
    pub fn render(
        &self,
        image: &SourceImage,
        surface: &mut Surface,
        params: &RenderParams,
    ) -> Result<RenderSummary, PixelError> {
        params.validate()?;
        let (width, height) = surface.dimensions();
        let geometry = GridGeometry::derive(width, height, params.cell_size)?;

        surface.clear();

        let grid = downsample(image.pixels(), geometry, self.options.filter);
        let adjust = params.color_adjust();
        let painter = CellPainter::new(self.options.style, self.options.dot);

        for (x, y, rgb) in grid.iter() {
            painter.paint(surface, x, y, geometry.cell_size, adjust.transform(rgb));
        }

        let cells = geometry.cell_count();
        debug!(
            "rendered {cells} cells ({}x{} of {}px, {:?}) onto {width}x{height} surface",
            geometry.columns, geometry.rows, geometry.cell_size, self.options.style
        );

        Ok(RenderSummary { geometry, cells })
    }

    /// Allocates a surface sized by `sizing` and renders into it.
    pub fn render_to_surface(
        &self,
        image: &SourceImage,
        sizing: SizingPolicy,
        params: &RenderParams,
    ) -> Result<Surface, PixelError> {
        let (width, height) = image.dimensions();
        let (width, height) =
            sizing.surface_size(width, height).ok_or(PixelError::EmptyImage)?;
        let mut surface = Surface::new(width, height)?;
        self.render(image, &mut surface, params)?;
        Ok(surface)
    }
}
