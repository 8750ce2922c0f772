//! World content manifest download.
//!
//! The manifest index advertises one zipped SQLite database per language
//! under `mobileWorldContentPaths`. The archive holds a single member named
//! after the basename of the advertised path.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;
use tracing::{debug, info};
use zip::ZipArchive;

use super::{Dapi, Transport};
use crate::error::{Error, Result};

const ARCHIVE_FILE: &str = "world_content.zip";

/// Extracted world content database.
///
/// The database lives in a temporary directory that is removed when this
/// value is dropped; use [`WorldManifest::persist`] to keep it.
#[derive(Debug)]
pub struct WorldManifest {
    version: Option<String>,
    path: PathBuf,
    _dir: TempDir,
}

impl WorldManifest {
    /// Path to the extracted database
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Manifest version reported by the index
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Copy the database to `dest`, returning the destination path
    pub fn persist<P: AsRef<Path>>(&self, dest: P) -> Result<PathBuf> {
        let dest = dest.as_ref();
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&self.path, dest)?;
        info!("Saved world manifest to {}", dest.display());
        Ok(dest.to_path_buf())
    }
}

/// File name of the database inside the archive for a content path
pub fn content_file_name(content_path: &str) -> Option<&str> {
    content_path
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
}

fn extract_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    debug!("Extracting {} archive entries", archive.len());
    archive.extract(dest)?;
    Ok(())
}

impl<T: Transport> Dapi<T> {
    /// Download and extract the world content database for `language`
    pub fn fetch_world_manifest(&self, language: &str) -> Result<WorldManifest> {
        let index = self
            .manifest_index()?
            .ok_or_else(|| Error::Manifest("Manifest index is empty".to_string()))?;

        let content_path = index
            .get("mobileWorldContentPaths")
            .and_then(|paths| paths.get(language))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::Manifest(format!(
                    "Language \"{}\" is not listed in the manifest",
                    language
                ))
            })?;
        let file_name = content_file_name(content_path).ok_or_else(|| {
            Error::Manifest(format!("Invalid content path \"{}\"", content_path))
        })?;

        let dir = tempfile::Builder::new().prefix("dapi-manifest").tempdir()?;
        let archive_path = dir.path().join(ARCHIVE_FILE);

        let url = format!(
            "{}/{}",
            self.config.content_base_url.trim_end_matches('/'),
            content_path.trim_start_matches('/')
        );
        info!("Downloading world manifest ({}) from {}", language, url);
        {
            let mut writer = BufWriter::new(File::create(&archive_path)?);
            let size = self.transport.download(&url, &mut writer)?;
            writer.flush()?;
            debug!("Downloaded {} bytes", size);
        }

        extract_archive(&archive_path, dir.path())?;
        fs::remove_file(&archive_path)?;

        let path = dir.path().join(file_name);
        if !path.is_file() {
            return Err(Error::Manifest(format!(
                "Expected \"{}\" in the manifest archive",
                file_name
            )));
        }

        Ok(WorldManifest {
            version: index
                .get("version")
                .and_then(Value::as_str)
                .map(str::to_string),
            path,
            _dir: dir,
        })
    }
}
