use crate::raster::{rasterize_icon, GeneratedIcon, RasterOptions};
use crate::{IconError, SourceImage, TargetSizeSet};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives notifications while a batch is generated.
pub trait Progress {
    /// Called after each icon, `done` counts from 1 to `total`.
    fn icon_generated(&mut self, _done: usize, _total: usize, _icon: &GeneratedIcon) {}

    fn batch_finished(&mut self, _batch: &IconBatch) {}

    fn batch_failed(&mut self, _error: &anyhow::Error) {}
}

impl Progress for () {}

/// Shared flag that stops a generation run before its next icon.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Icons of one generation run, ordered like the size set they came from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IconBatch {
    icons: Vec<GeneratedIcon>,
}

impl IconBatch {
    pub fn icons(&self) -> &[GeneratedIcon] {
        &self.icons
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn get(&self, size: u32) -> Option<&GeneratedIcon> {
        self.icons.iter().find(|icon| icon.size() == size)
    }

    pub fn sizes(&self) -> Vec<u32> {
        self.icons.iter().map(GeneratedIcon::size).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneratedIcon> {
        self.icons.iter()
    }
}

impl<'a> IntoIterator for &'a IconBatch {
    type Item = &'a GeneratedIcon;
    type IntoIter = std::slice::Iter<'a, GeneratedIcon>;

    fn into_iter(self) -> Self::IntoIter {
        self.icons.iter()
    }
}

/// Rasterizes `source` once per size, in order.
///
/// Either every size is produced or an error is returned; partial batches
/// are never handed out. `progress` sees one call per icon and a final
/// `batch_finished` or `batch_failed`.
pub fn generate(
    source: &SourceImage,
    sizes: &TargetSizeSet,
    opts: &RasterOptions,
    progress: &mut dyn Progress,
    cancel: &CancelToken,
) -> Result<IconBatch> {
    match generate_icons(source, sizes, opts, progress, cancel) {
        Ok(batch) => {
            tracing::info!(icons = batch.len(), "generated icon batch");
            progress.batch_finished(&batch);
            Ok(batch)
        }
        Err(err) => {
            progress.batch_failed(&err);
            Err(err)
        }
    }
}

fn generate_icons(
    source: &SourceImage,
    sizes: &TargetSizeSet,
    opts: &RasterOptions,
    progress: &mut dyn Progress,
    cancel: &CancelToken,
) -> Result<IconBatch> {
    let total = sizes.len();
    let mut icons = Vec::with_capacity(total);
    for (i, size) in sizes.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(IconError::Cancelled.into());
        }
        let icon = rasterize_icon(source, size, opts)?;
        progress.icon_generated(i + 1, total, &icon);
        icons.push(icon);
    }
    Ok(IconBatch { icons })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[derive(Default)]
    struct Recorder {
        icons: Vec<(usize, usize, u32)>,
        finished: Option<usize>,
        failed: bool,
    }

    impl Progress for Recorder {
        fn icon_generated(&mut self, done: usize, total: usize, icon: &GeneratedIcon) {
            self.icons.push((done, total, icon.size()));
        }

        fn batch_finished(&mut self, batch: &IconBatch) {
            self.finished = Some(batch.len());
        }

        fn batch_failed(&mut self, _error: &anyhow::Error) {
            self.failed = true;
        }
    }

    fn source() -> SourceImage {
        SourceImage::from_image(RgbaImage::from_pixel(64, 64, Rgba([40, 80, 120, 255]))).unwrap()
    }

    #[test]
    fn test_progress_per_icon() -> Result<()> {
        let sizes = TargetSizeSet::new(vec![48, 16, 32])?;
        let mut recorder = Recorder::default();
        let batch = generate(
            &source(),
            &sizes,
            &RasterOptions::default(),
            &mut recorder,
            &CancelToken::new(),
        )?;
        assert_eq!(batch.sizes(), vec![48, 16, 32]);
        assert_eq!(recorder.icons, vec![(1, 3, 48), (2, 3, 16), (3, 3, 32)]);
        assert_eq!(recorder.finished, Some(3));
        assert!(!recorder.failed);
        Ok(())
    }

    #[test]
    fn test_cancelled_run_yields_nothing() -> Result<()> {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut recorder = Recorder::default();
        let err = generate(
            &source(),
            &TargetSizeSet::default(),
            &RasterOptions::default(),
            &mut recorder,
            &cancel,
        )
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<IconError>(), Some(IconError::Cancelled)));
        assert!(recorder.icons.is_empty());
        assert!(recorder.failed);
        assert_eq!(recorder.finished, None);
        Ok(())
    }

    #[test]
    fn test_surface_failure_fails_whole_batch() -> Result<()> {
        let sizes = TargetSizeSet::new(vec![16, crate::MAX_SURFACE_DIM + 1])?;
        let mut recorder = Recorder::default();
        let err = generate(
            &source(),
            &sizes,
            &RasterOptions::default(),
            &mut recorder,
            &CancelToken::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IconError>(),
            Some(IconError::RasterSurfaceFailure { .. })
        ));
        assert_eq!(recorder.icons.len(), 1);
        assert!(recorder.failed);
        Ok(())
    }

    #[test]
    fn test_lookup_by_size() -> Result<()> {
        let batch = generate(
            &source(),
            &TargetSizeSet::new(vec![20, 10])?,
            &RasterOptions::default(),
            &mut (),
            &CancelToken::new(),
        )?;
        assert_eq!(batch.get(10).map(GeneratedIcon::size), Some(10));
        assert!(batch.get(11).is_none());
        assert_eq!(batch.iter().count(), 2);
        Ok(())
    }
}
