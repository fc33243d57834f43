/// Failures surfaced by icon generation and packaging.
///
/// Operations return `anyhow::Result`; callers that need to branch on the
/// failure kind use `err.downcast_ref::<IconError>()`.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("no source image loaded")]
    InputMissing,

    #[error("no icons have been generated")]
    NoBatch,

    #[error("failed to decode image: {0}")]
    DecodeFailure(String),

    #[error("unsupported image type {0}")]
    UnsupportedFormat(String),

    #[error("source image has no pixels ({width}x{height})")]
    EmptySource { width: u32, height: u32 },

    #[error("invalid icon sizes: {0}")]
    InvalidSizes(String),

    #[error("cannot allocate a {size}x{size} raster surface")]
    RasterSurfaceFailure { size: u32 },

    #[error("failed to assemble archive: {0}")]
    ArchiveFailure(String),

    #[error("icon generation was superseded")]
    Cancelled,

    #[error("no {0}x{0} icon in the current batch")]
    UnknownSize(u32),
}
