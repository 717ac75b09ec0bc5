//! Unpacking of downloaded archives into a dataset directory.
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use log::info;

use crate::error::{FetchError, Result};

/// Archive formats understood by [`uncompress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Tar,
    TarGz,
    /// A single gzip-compressed file.
    Gz,
}

impl ArchiveKind {
    /// Detect the format from the file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveKind::TarGz)
        } else if name.ends_with(".tar") {
            Some(ArchiveKind::Tar)
        } else if name.ends_with(".gz") {
            Some(ArchiveKind::Gz)
        } else {
            None
        }
    }
}

/// Unpack `archive` into `target_directory` and delete the archive.
///
/// Extraction happens in a temporary directory inside the target and is
/// merged in afterwards, so a failed extraction leaves no half-written files
/// next to the cached ones.
pub fn uncompress(archive: &Path, target_directory: &Path, verbose: u8) -> Result<()> {
    let kind = ArchiveKind::from_path(archive).ok_or_else(|| FetchError::UnsupportedArchive {
        path: archive.to_path_buf(),
    })?;

    if verbose > 0 {
        info!("Extracting data from {}...", archive.display());
    }

    fs::create_dir_all(target_directory).map_err(|e| FetchError::io(target_directory, e))?;
    let tmp = tempfile::Builder::new()
        .prefix(".extract-")
        .tempdir_in(target_directory)
        .map_err(|e| FetchError::io(target_directory, e))?;

    let file = File::open(archive).map_err(|e| FetchError::io(archive, e))?;
    let reader = BufReader::with_capacity(1024 * 1024, file);

    match kind {
        ArchiveKind::Zip => {
            let mut zip = zip::ZipArchive::new(reader).map_err(|e| FetchError::extract(archive, e))?;
            zip.extract(tmp.path())
                .map_err(|e| FetchError::extract(archive, e))?;
        }
        ArchiveKind::Tar => {
            tar::Archive::new(reader)
                .unpack(tmp.path())
                .map_err(|e| FetchError::extract(archive, e))?;
        }
        ArchiveKind::TarGz => {
            tar::Archive::new(GzDecoder::new(reader))
                .unpack(tmp.path())
                .map_err(|e| FetchError::extract(archive, e))?;
        }
        ArchiveKind::Gz => {
            let stem = archive
                .file_stem()
                .ok_or_else(|| FetchError::extract(archive, "archive has no file name"))?;
            let out_path = tmp.path().join(stem);
            let mut out = File::create(&out_path).map_err(|e| FetchError::io(&out_path, e))?;
            io::copy(&mut GzDecoder::new(reader), &mut out)
                .map_err(|e| FetchError::extract(archive, e))?;
        }
    }

    merge_dir(tmp.path(), target_directory)?;
    fs::remove_file(archive).map_err(|e| FetchError::io(archive, e))?;

    if verbose > 0 {
        info!("...done.");
    }
    Ok(())
}

/// Move the contents of `src` into `dest`, descending into directories that
/// exist on both sides and replacing files that exist on both sides.
fn merge_dir(src: &Path, dest: &Path) -> Result<()> {
    for entry in fs::read_dir(src).map_err(|e| FetchError::io(src, e))? {
        let entry = entry.map_err(|e| FetchError::io(src, e))?;
        let from = entry.path();
        let to = dest.join(entry.file_name());

        if from.is_dir() && to.is_dir() {
            merge_dir(&from, &to)?;
            continue;
        }
        if to.is_dir() {
            fs::remove_dir_all(&to).map_err(|e| FetchError::io(&to, e))?;
        } else if to.exists() {
            fs::remove_file(&to).map_err(|e| FetchError::io(&to, e))?;
        }
        fs::rename(&from, &to).map_err(|e| FetchError::io(&to, e))?;
    }
    Ok(())
}
