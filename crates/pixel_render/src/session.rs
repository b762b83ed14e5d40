use log::debug;

use crate::{
    PixelError, PixelRenderer, RenderOptions, RenderParams, RenderSummary, SizingPolicy,
    SourceImage, Surface,
};

/// Caller-owned preview state: the current image, the last parameters and
/// the surface they were rendered onto.
#[derive(Debug)]
pub struct PreviewSession {
    renderer: PixelRenderer,
    sizing: SizingPolicy,
    params: RenderParams,
    image: Option<SourceImage>,
    surface: Option<Surface>,
    last_summary: Option<RenderSummary>,
}

impl PreviewSession {
    pub fn new(options: RenderOptions, sizing: SizingPolicy, params: RenderParams) -> Self {
        Self {
            renderer: PixelRenderer::new(options),
            sizing,
            params,
            image: None,
            surface: None,
            last_summary: None,
        }
    }

    /// Replaces the current image, resizes the surface for it and renders.
    pub fn load_image(&mut self, image: SourceImage) -> Result<RenderSummary, PixelError> {
        let (width, height) = image.dimensions();
        let (surface_width, surface_height) =
            self.sizing.surface_size(width, height).ok_or(PixelError::EmptyImage)?;

        let reuse = self
            .surface
            .as_ref()
            .is_some_and(|surface| surface.dimensions() == (surface_width, surface_height));
        if !reuse {
            self.surface = Some(Surface::new(surface_width, surface_height)?);
        }

        debug!("preview surface {surface_width}x{surface_height} for {width}x{height} image");
        self.image = Some(image);
        self.redraw()
    }

    /// Applies new parameters. Returns `false` without rendering when they are
    /// unchanged or no image is loaded.
    pub fn set_params(&mut self, params: RenderParams) -> Result<bool, PixelError> {
        params.validate()?;
        if params == self.params {
            return Ok(false);
        }

        self.params = params;
        self.render()
    }

    pub fn set_options(&mut self, options: RenderOptions) -> Result<bool, PixelError> {
        self.renderer.set_options(options);
        self.render()
    }

    /// Re-renders the current image. A missing image is a no-op.
    pub fn render(&mut self) -> Result<bool, PixelError> {
        if self.image.is_none() {
            return Ok(false);
        }

        self.redraw().map(|_| true)
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn last_summary(&self) -> Option<RenderSummary> {
        self.last_summary
    }

    fn redraw(&mut self) -> Result<RenderSummary, PixelError> {
        let (Some(image), Some(surface)) = (&self.image, &mut self.surface) else {
            return Err(PixelError::EmptyImage);
        };

        let summary = self.renderer.render(image, surface, &self.params)?;
        self.last_summary = Some(summary);
        Ok(summary)
    }
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new(RenderOptions::default(), SizingPolicy::default(), RenderParams::default())
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;
    use crate::RenderStyle;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> SourceImage {
        SourceImage::new(RgbaImage::from_pixel(width, height, Rgba(color))).unwrap()
    }

    #[test]
    fn render_without_image_is_noop() {
        let mut session = PreviewSession::default();
        assert!(!session.render().unwrap());
        assert!(session.surface().is_none());
        assert!(!session.set_params(RenderParams::from_percentages(5, 50.0, 50.0)).unwrap());
        assert_eq!(session.params().cell_size, 5);
    }

    #[test]
    fn loading_sizes_surface_to_fixed_width() {
        let mut session = PreviewSession::default();
        let summary = session.load_image(solid(160, 90, [0, 128, 0, 255])).unwrap();

        assert_eq!(session.surface().unwrap().dimensions(), (800, 450));
        assert_eq!((summary.geometry.columns, summary.geometry.rows), (80, 45));
        assert_eq!(session.surface().unwrap().pixel(799, 449), Some([0, 128, 0, 255]));
    }

    #[test]
    fn parameter_changes_rerender() {
        let mut session = PreviewSession::default();
        session.load_image(solid(40, 40, [200, 40, 40, 255])).unwrap();

        let gray = RenderParams::from_percentages(10, 0.0, 100.0);
        assert!(session.set_params(gray).unwrap());
        assert_eq!(session.surface().unwrap().pixel(0, 0), Some([128, 128, 128, 255]));

        assert!(!session.set_params(gray).unwrap());
        assert!(session.set_params(RenderParams { cell_size: 0, ..gray }).is_err());
        assert_eq!(session.params(), &gray);
    }

    #[test]
    fn style_changes_rerender() {
        let mut session = PreviewSession::new(
            RenderOptions::default(),
            SizingPolicy::Native,
            RenderParams::from_percentages(10, 100.0, 100.0),
        );
        session.load_image(solid(20, 20, [0, 0, 255, 255])).unwrap();
        assert_eq!(session.surface().unwrap().pixel(0, 0), Some([0, 0, 255, 255]));

        let options = RenderOptions { style: RenderStyle::Dot, ..RenderOptions::default() };
        assert!(session.set_options(options).unwrap());
        assert_eq!(session.surface().unwrap().pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn new_image_replaces_surface_size() {
        let mut session = PreviewSession::default();
        session.load_image(solid(100, 100, [1, 1, 1, 255])).unwrap();
        assert_eq!(session.surface().unwrap().dimensions(), (800, 800));

        session.load_image(solid(200, 100, [1, 1, 1, 255])).unwrap();
        assert_eq!(session.surface().unwrap().dimensions(), (800, 400));
        assert_eq!(session.last_summary().unwrap().cells, 80 * 40);
    }
}
