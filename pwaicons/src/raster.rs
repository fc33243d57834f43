use crate::{icon_name, IconError, SourceImage};
use anyhow::{Context, Result};
use iconcommon::{Filter, ScaleOptions, Shadow};
use std::io::Cursor;

/// Largest edge length a raster surface may have.
pub const MAX_SURFACE_DIM: u32 = 16384;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterOptions {
    pub filter: Filter,
    pub shadow: bool,
    pub optimize: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            filter: Filter::Triangle,
            shadow: true,
            optimize: true,
        }
    }
}

impl RasterOptions {
    fn scale_options(&self) -> ScaleOptions {
        ScaleOptions {
            filter: self.filter,
            shadow: self.shadow.then(Shadow::default),
            optimize: self.optimize,
        }
    }
}

/// A png encoded icon of `size` x `size` pixels.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedIcon {
    size: u32,
    png: Vec<u8>,
}

impl GeneratedIcon {
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn file_name(&self) -> String {
        icon_name(self.size)
    }

    /// Download name and contents of this icon. The encoded buffer is
    /// handed out as is.
    pub fn export_single(&self) -> (String, &[u8]) {
        (self.file_name(), &self.png)
    }
}

/// Renders `source` stretched onto a `size` x `size` surface and encodes
/// it as png.
pub fn rasterize(source: &SourceImage, size: u32, opts: &RasterOptions) -> Result<Vec<u8>> {
    check_surface(size)?;
    let mut buf = vec![];
    source
        .scaler()
        .write(&mut Cursor::new(&mut buf), size, &opts.scale_options())
        .with_context(|| format!("failed to encode {}", icon_name(size)))?;
    tracing::debug!(size, bytes = buf.len(), "rasterized icon");
    Ok(buf)
}

pub(crate) fn rasterize_icon(
    source: &SourceImage,
    size: u32,
    opts: &RasterOptions,
) -> Result<GeneratedIcon> {
    let png = rasterize(source, size, opts)?;
    Ok(GeneratedIcon { size, png })
}

fn check_surface(size: u32) -> Result<()> {
    let bytes = (size as usize)
        .checked_mul(size as usize)
        .and_then(|pixels| pixels.checked_mul(4));
    if size == 0 || size > MAX_SURFACE_DIM || bytes.is_none() {
        return Err(IconError::RasterSurfaceFailure { size }.into());
    }
    Ok(())
}
