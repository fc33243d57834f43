use crate::IconError;
use anyhow::Result;
use iconcommon::Scaler;
use image::RgbaImage;
use std::path::Path;
use std::sync::Arc;

/// Upload types accepted as icon sources.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Decoded source bitmap. Immutable and cheap to clone.
#[derive(Clone)]
pub struct SourceImage {
    scaler: Arc<Scaler>,
}

impl SourceImage {
    pub fn from_image(img: RgbaImage) -> Result<Self> {
        Self::from_scaler(Scaler::new(img))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let format =
            image::guess_format(bytes).map_err(|err| IconError::DecodeFailure(err.to_string()))?;
        let mime = format.to_mime_type();
        if !ACCEPTED_MIME_TYPES.contains(&mime) {
            return Err(IconError::UnsupportedFormat(mime.to_string()).into());
        }
        let scaler = Scaler::decode(bytes, format)
            .map_err(|err| IconError::DecodeFailure(format!("{:#}", err)))?;
        Self::from_scaler(scaler)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    fn from_scaler(scaler: Scaler) -> Result<Self> {
        let (width, height) = scaler.dimensions();
        if width == 0 || height == 0 {
            return Err(IconError::EmptySource { width, height }.into());
        }
        tracing::debug!(width, height, "loaded source image");
        Ok(Self {
            scaler: Arc::new(scaler),
        })
    }

    pub fn width(&self) -> u32 {
        self.scaler.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.scaler.dimensions().1
    }

    pub(crate) fn scaler(&self) -> &Scaler {
        &self.scaler
    }
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
