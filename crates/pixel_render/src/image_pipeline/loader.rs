use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, RgbaImage};
use log::debug;

use crate::PixelError;

/// Delay given to frames that carry no timing of their own.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(120);

/// Decoded source bitmap. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    pub fn new(pixels: RgbaImage) -> Result<Self, PixelError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(PixelError::EmptyImage);
        }
        Ok(Self { pixels })
    }

    pub fn from_dynamic(image: DynamicImage) -> Result<Self, PixelError> {
        Self::new(image.into_rgba8())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PixelError> {
        let path = path.as_ref();
        let image = Self::from_dynamic(image::open(path)?)?;
        debug!("loaded image {}x{} from {}", image.width(), image.height(), path.display());
        Ok(image)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// One frame of a possibly animated source.
#[derive(Clone, Debug)]
pub struct SourceFrame {
    pub image: SourceImage,
    pub delay: Duration,
}

/// Loads every frame of a GIF, or the single frame of any other image.
pub fn load_frames<P: AsRef<Path>>(path: P) -> Result<Vec<SourceFrame>, PixelError> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()).map(|ext| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "gif" => load_frames_from_gif(path),
        _ => Ok(vec![SourceFrame { image: SourceImage::open(path)?, delay: DEFAULT_FRAME_DELAY }]),
    }
}

fn load_frames_from_gif(path: &Path) -> Result<Vec<SourceFrame>, PixelError> {
    let decoder = GifDecoder::new(BufReader::new(File::open(path)?))?;
    let frames = decoder.into_frames().collect_frames()?;

    let mut result = Vec::with_capacity(frames.len());
    for frame in frames {
        let delay = Duration::from(frame.delay());
        let image = SourceImage::new(frame.into_buffer())?;
        debug!("loaded frame {}x{} from {}", image.width(), image.height(), path.display());
        let delay = if delay.is_zero() { DEFAULT_FRAME_DELAY } else { delay };
        result.push(SourceFrame { image, delay });
    }

    Ok(result)
}
