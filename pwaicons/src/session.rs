use crate::{
    assemble_named, generate, Archive, CancelToken, IconBatch, IconConfig, IconError, Progress,
    RasterOptions, SourceImage, TargetSizeSet,
};
use anyhow::Result;
use iconcommon::ZipFileOptions;
use std::sync::Arc;

/// State owned by one user session: the current source image and the
/// most recent icon batch.
///
/// Both are replaced wholesale. Loading a new image or starting a new run
/// supersedes any run still in flight, whose result is then discarded.
pub struct Session {
    sizes: TargetSizeSet,
    raster: RasterOptions,
    compression: ZipFileOptions,
    archive_name: String,
    source: Option<SourceImage>,
    batch: Option<Arc<IconBatch>>,
    ticket: u64,
    in_flight: bool,
    cancel: CancelToken,
}

/// A generation run detached from its session, so it can be executed on
/// another thread.
pub struct GenerationRun {
    ticket: u64,
    source: SourceImage,
    sizes: TargetSizeSet,
    raster: RasterOptions,
    cancel: CancelToken,
}

impl GenerationRun {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn run(&self, progress: &mut dyn Progress) -> Result<IconBatch> {
        generate(
            &self.source,
            &self.sizes,
            &self.raster,
            progress,
            &self.cancel,
        )
    }
}

impl Session {
    pub fn new(config: &IconConfig) -> Result<Self> {
        Ok(Self {
            sizes: config.target_sizes()?,
            raster: config.raster_options(),
            compression: config.compression,
            archive_name: config.archive_name.clone(),
            source: None,
            batch: None,
            ticket: 0,
            in_flight: false,
            cancel: CancelToken::new(),
        })
    }

    pub fn sizes(&self) -> &TargetSizeSet {
        &self.sizes
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn batch(&self) -> Option<&IconBatch> {
        self.batch.as_deref()
    }

    /// Shared handle to the current batch for previews that outlive a
    /// borrow of the session.
    pub fn shared_batch(&self) -> Option<Arc<IconBatch>> {
        self.batch.clone()
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight
    }

    /// Replaces the source image, dropping the current batch and any
    /// run still in flight.
    pub fn load(&mut self, source: SourceImage) {
        self.supersede();
        self.in_flight = false;
        self.batch = None;
        self.source = Some(source);
    }

    /// Decodes an uploaded file and loads it. A file that fails to decode
    /// leaves the session untouched.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let source = SourceImage::from_bytes(bytes)?;
        self.load(source);
        Ok(())
    }

    pub fn begin_generate(&mut self) -> Result<GenerationRun> {
        let source = self.source.clone().ok_or(IconError::InputMissing)?;
        self.supersede();
        self.in_flight = true;
        Ok(GenerationRun {
            ticket: self.ticket,
            source,
            sizes: self.sizes.clone(),
            raster: self.raster,
            cancel: self.cancel.clone(),
        })
    }

    /// Hands the result of a run back to the session.
    ///
    /// Returns `Ok(false)` when the run has been superseded; its result is
    /// dropped. A failed current run leaves the previous batch in place.
    pub fn complete(&mut self, ticket: u64, result: Result<IconBatch>) -> Result<bool> {
        if ticket != self.ticket {
            tracing::warn!(ticket, current = self.ticket, "discarding superseded icon batch");
            return Ok(false);
        }
        self.in_flight = false;
        self.batch = Some(Arc::new(result?));
        Ok(true)
    }

    /// Runs a whole generation synchronously on the calling thread.
    pub fn generate(&mut self, progress: &mut dyn Progress) -> Result<&IconBatch> {
        let run = self.begin_generate()?;
        let result = run.run(progress);
        self.complete(run.ticket(), result)?;
        self.batch().ok_or_else(|| IconError::NoBatch.into())
    }

    pub fn archive(&self) -> Result<Archive> {
        let batch = self.batch().ok_or(IconError::NoBatch)?;
        assemble_named(batch, self.compression, &self.archive_name)
    }

    pub fn export_single(&self, size: u32) -> Result<(String, &[u8])> {
        let batch = self.batch().ok_or(IconError::NoBatch)?;
        let icon = batch.get(size).ok_or(IconError::UnknownSize(size))?;
        Ok(icon.export_single())
    }

    fn supersede(&mut self) {
        self.cancel.cancel();
        self.cancel = CancelToken::new();
        self.ticket += 1;
    }
}
