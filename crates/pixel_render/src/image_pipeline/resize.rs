use log::trace;

use crate::PixelError;

/// Width of the preview surface when the caller does not choose one.
pub const DEFAULT_SURFACE_WIDTH: u32 = 800;

/// Cell grid covering a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    pub columns: u32,
    pub rows: u32,
    pub cell_size: u32,
}

impl GridGeometry {
    /// Grid of `ceil(width / cell_size) x ceil(height / cell_size)` cells.
    pub fn derive(
        surface_width: u32,
        surface_height: u32,
        cell_size: u32,
    ) -> Result<Self, PixelError> {
        if cell_size == 0 {
            return Err(PixelError::InvalidParameter("cell size must be at least 1".into()));
        }

        if surface_width == 0 || surface_height == 0 {
            return Err(PixelError::InvalidSurface {
                width: surface_width,
                height: surface_height,
            });
        }

        Ok(Self {
            columns: surface_width.div_ceil(cell_size),
            rows: surface_height.div_ceil(cell_size),
            cell_size,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// How the output surface is sized relative to the source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizingPolicy {
    /// Fixed width, height following the source aspect ratio.
    FixedWidth(u32),
    /// Same size as the source image.
    Native,
    Exact { width: u32, height: u32 },
}

impl Default for SizingPolicy {
    fn default() -> Self {
        SizingPolicy::FixedWidth(DEFAULT_SURFACE_WIDTH)
    }
}

impl SizingPolicy {
    pub fn surface_size(&self, source_width: u32, source_height: u32) -> Option<(u32, u32)> {
        if source_width == 0 || source_height == 0 {
            return None;
        }

        let size = match *self {
            SizingPolicy::FixedWidth(width) => {
                let width = width.max(1);
                // Truncates like assigning a fractional canvas height.
                let height = u64::from(width) * u64::from(source_height) / u64::from(source_width);
                (width, (height.min(u64::from(u32::MAX)) as u32).max(1))
            },
            SizingPolicy::Native => (source_width, source_height),
            SizingPolicy::Exact { width, height } => (width.max(1), height.max(1)),
        };

        trace!("sized surface {}x{} for source {source_width}x{source_height}", size.0, size.1);
        Some(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_divides_exact_multiples() {
        let geometry = GridGeometry::derive(800, 450, 10).unwrap();
        assert_eq!((geometry.columns, geometry.rows), (80, 45));
        assert_eq!(geometry.cell_count(), 3600);
    }

    #[test]
    fn grid_rounds_partial_cells_up() {
        let geometry = GridGeometry::derive(801, 449, 10).unwrap();
        assert_eq!((geometry.columns, geometry.rows), (81, 45));
    }

    #[test]
    fn cell_as_wide_as_surface_gives_single_column() {
        let geometry = GridGeometry::derive(800, 1200, 800).unwrap();
        assert_eq!((geometry.columns, geometry.rows), (1, 2));

        let geometry = GridGeometry::derive(100, 100, 100).unwrap();
        assert_eq!((geometry.columns, geometry.rows), (1, 1));
    }

    #[test]
    fn zero_cell_size_is_rejected() {
        assert!(matches!(GridGeometry::derive(800, 450, 0), Err(PixelError::InvalidParameter(_))));
        assert!(matches!(
            GridGeometry::derive(0, 450, 10),
            Err(PixelError::InvalidSurface { width: 0, height: 450 })
        ));
    }

    #[test]
    fn fixed_width_follows_aspect_ratio() {
        let policy = SizingPolicy::default();
        assert_eq!(policy.surface_size(1920, 1080), Some((800, 450)));
        assert_eq!(policy.surface_size(3, 2), Some((800, 533)));
        assert_eq!(policy.surface_size(10_000, 1), Some((800, 1)));
        assert_eq!(policy.surface_size(0, 10), None);
    }

    #[test]
    fn native_and_exact_sizes() {
        assert_eq!(SizingPolicy::Native.surface_size(64, 48), Some((64, 48)));
        assert_eq!(
            SizingPolicy::Exact { width: 10, height: 0 }.surface_size(64, 48),
            Some((10, 1))
        );
    }
}
