use anyhow::Result;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use serde::Deserialize;
use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Resampling filter used when scaling the source bitmap.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<Filter> for FilterType {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => Self::Nearest,
            Filter::Triangle => Self::Triangle,
            Filter::CatmullRom => Self::CatmullRom,
            Filter::Gaussian => Self::Gaussian,
            Filter::Lanczos3 => Self::Lanczos3,
        }
    }
}

/// Drop shadow painted underneath the scaled image.
///
/// The image always covers the whole surface, so the shadow only shows
/// through pixels that are not fully opaque.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub offset: (i64, i64),
    pub blur: f32,
    pub opacity: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            offset: (1, 1),
            blur: 2.0,
            opacity: 0.1,
        }
    }
}

impl Shadow {
    pub fn paint(&self, img: &RgbaImage) -> RgbaImage {
        let (width, height) = img.dimensions();
        let mut layer = RgbaImage::new(width, height);
        for (x, y, pixel) in layer.enumerate_pixels_mut() {
            let sx = x as i64 - self.offset.0;
            let sy = y as i64 - self.offset.1;
            if sx < 0 || sy < 0 || sx >= width as i64 || sy >= height as i64 {
                continue;
            }
            let alpha = img.get_pixel(sx as u32, sy as u32)[3] as f32 * self.opacity;
            *pixel = Rgba([0, 0, 0, alpha.round() as u8]);
        }
        // canvas blur radius is twice the gaussian sigma
        let mut layer = if self.blur > 0.0 {
            imageops::blur(&layer, self.blur / 2.0)
        } else {
            layer
        };
        imageops::overlay(&mut layer, img, 0, 0);
        layer
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScaleOptions {
    pub filter: Filter,
    pub shadow: Option<Shadow>,
    /// Store the png with the narrowest lossless color type.
    pub optimize: bool,
}

pub struct Scaler {
    img: RgbaImage,
}

impl Scaler {
    pub fn new(img: RgbaImage) -> Self {
        Self { img }
    }

    pub fn decode(bytes: &[u8], format: ImageFormat) -> Result<Self> {
        let img = image::load_from_memory_with_format(bytes, format)?.to_rgba8();
        Ok(Self { img })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.img
    }

    /// Stretches the bitmap to fill a `size` x `size` square.
    pub fn scale(&self, size: u32, opts: &ScaleOptions) -> RgbaImage {
        let scaled = imageops::resize(&self.img, size, size, opts.filter.into());
        match opts.shadow {
            Some(shadow) => shadow.paint(&scaled),
            None => scaled,
        }
    }

    pub fn write<W: Write + Seek>(&self, w: &mut W, size: u32, opts: &ScaleOptions) -> Result<()> {
        let scaled = self.scale(size, opts);
        let img = if opts.optimize {
            optimize(scaled)
        } else {
            DynamicImage::ImageRgba8(scaled)
        };
        img.write_to(w, ImageFormat::Png)?;
        Ok(())
    }
}

fn optimize(img: RgbaImage) -> DynamicImage {
    let is_grayscale = img.pixels().all(|p| p[0] == p[1] && p[1] == p[2]);
    let is_opaque = img.pixels().all(|p| p[3] == 255);
    let img = DynamicImage::ImageRgba8(img);
    match (is_grayscale, is_opaque) {
        (true, true) => DynamicImage::ImageLuma8(img.to_luma8()),
        (true, false) => DynamicImage::ImageLumaA8(img.to_luma_alpha8()),
        (false, true) => DynamicImage::ImageRgb8(img.to_rgb8()),
        (false, false) => img,
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum ZipFileOptions {
    Stored,
    #[default]
    Compressed,
}

impl ZipFileOptions {
    pub fn compression_method(&self) -> CompressionMethod {
        match self {
            Self::Compressed => CompressionMethod::Deflated,
            Self::Stored => CompressionMethod::Stored,
        }
    }
}

pub struct Zip<W: Write + Seek> {
    zip: ZipWriter<W>,
}

impl Zip<Cursor<Vec<u8>>> {
    pub fn in_memory() -> Self {
        Self::new(Cursor::new(Vec::new()))
    }
}

impl<W: Write + Seek> Zip<W> {
    pub fn new(w: W) -> Self {
        Self {
            zip: ZipWriter::new(w),
        }
    }

    pub fn create_file(&mut self, name: &str, opts: ZipFileOptions, contents: &[u8]) -> Result<()> {
        // fixed timestamp keeps archives reproducible
        let zopts = FileOptions::default()
            .compression_method(opts.compression_method())
            .last_modified_time(DateTime::default());
        self.zip.start_file(name, zopts)?;
        self.zip.write_all(contents)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        Ok(self.zip.finish()?)
    }
}
