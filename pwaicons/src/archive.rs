use crate::raster::GeneratedIcon;
use crate::{IconBatch, IconError};
use anyhow::Result;
use iconcommon::{Zip, ZipFileOptions};
use std::collections::HashSet;
use std::io::Cursor;

/// Default download name of the packaged icon set.
pub const ARCHIVE_NAME: &str = "pwa-icons.zip";

/// A finished zip archive, ready to be handed to a download.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Archive {
    name: String,
    bytes: Vec<u8>,
}

impl Archive {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

pub struct IconArchive {
    zip: Zip<Cursor<Vec<u8>>>,
    opts: ZipFileOptions,
    names: HashSet<String>,
}

impl IconArchive {
    pub fn new(opts: ZipFileOptions) -> Self {
        Self {
            zip: Zip::in_memory(),
            opts,
            names: HashSet::new(),
        }
    }

    pub fn add_icon(&mut self, icon: &GeneratedIcon) -> Result<()> {
        let name = icon.file_name();
        if !self.names.insert(name.clone()) {
            return Err(IconError::ArchiveFailure(format!("duplicate entry {}", name)).into());
        }
        self.zip
            .create_file(&name, self.opts, icon.png())
            .map_err(|err| IconError::ArchiveFailure(format!("{:#}", err)))?;
        Ok(())
    }

    pub fn finish(self, name: impl Into<String>) -> Result<Archive> {
        let entries = self.names.len();
        let bytes = self
            .zip
            .finish()
            .map_err(|err| IconError::ArchiveFailure(format!("{:#}", err)))?
            .into_inner();
        let archive = Archive {
            name: name.into(),
            bytes,
        };
        tracing::info!(
            name = archive.name(),
            entries,
            bytes = archive.bytes.len(),
            "assembled icon archive"
        );
        Ok(archive)
    }
}

/// Packs every icon of `batch` under its `icon-{size}x{size}.png` name.
pub fn assemble(batch: &IconBatch, opts: ZipFileOptions) -> Result<Archive> {
    assemble_named(batch, opts, ARCHIVE_NAME)
}

pub fn assemble_named(batch: &IconBatch, opts: ZipFileOptions, name: &str) -> Result<Archive> {
    let mut archive = IconArchive::new(opts);
    for icon in batch {
        archive.add_icon(icon)?;
    }
    archive.finish(name)
}
