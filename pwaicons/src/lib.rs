//! Generates the square icon set a PWA manifest needs from one source
//! image, and packages it for download.

mod archive;
mod batch;
mod config;
mod error;
mod raster;
mod session;
mod sizes;
mod source;
mod task;

pub use crate::archive::{assemble, assemble_named, Archive, IconArchive, ARCHIVE_NAME};
pub use crate::batch::{generate, CancelToken, IconBatch, Progress};
pub use crate::config::IconConfig;
pub use crate::error::IconError;
pub use crate::raster::{rasterize, GeneratedIcon, RasterOptions, MAX_SURFACE_DIM};
pub use crate::session::{GenerationRun, Session};
pub use crate::sizes::{icon_name, TargetSizeSet, ICON_SIZES};
pub use crate::source::{SourceImage, ACCEPTED_MIME_TYPES};
pub use crate::task::TaskRunner;
pub use iconcommon::{Filter, ZipFileOptions};

#[cfg(test)]
pub(crate) mod tests {
    use anyhow::Result;
    use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

    pub fn init_logger() -> Result<()> {
        tracing_log::LogTracer::init().ok();
        let env = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| "info".to_owned());
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_span_events(FmtSpan::ACTIVE | FmtSpan::CLOSE)
            .with_env_filter(EnvFilter::new(env))
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
        Ok(())
    }
}
