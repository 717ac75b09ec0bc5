/// Fetch layer: everything the atlas functions delegate to.
///
/// ```text
///  [(relative_path, url, options), ...]
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  dataset name → <root>/<name>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ http/ftp  │  cache hit? else download (.part, Range / REST resume)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ extract   │  zip / tar / tar.gz / gz → <root>/<name>/...
///   └──────────┘
///        │
///        ▼
///   [local path, ...]  same order as the request
/// ```

pub mod cache;
pub mod describe;
pub mod extract;
pub mod ftp;
pub mod http;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use cache::dataset_dir;
pub use describe::dataset_description;
pub use http::HttpFetcher;

/// Per-file post-processing flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileOptions {
    /// Unpack the downloaded file as an archive.
    pub uncompress: bool,
}

/// One expected file: where it lands relative to the dataset directory and
/// where to get it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    pub relative_path: PathBuf,
    pub url: String,
    pub options: FileOptions,
}

impl FileSpec {
    pub fn new(relative_path: impl Into<PathBuf>, url: impl Into<String>, options: FileOptions) -> Self {
        FileSpec {
            relative_path: relative_path.into(),
            url: url.into(),
            options,
        }
    }
}

/// Resolves a list of [`FileSpec`]s to local files, downloading whatever is
/// missing.
///
/// Implementations return exactly one path per spec, in request order.
pub trait FileFetcher {
    fn fetch_files(
        &self,
        data_dir: &Path,
        files: &[FileSpec],
        resume: bool,
        verbose: u8,
    ) -> Result<Vec<PathBuf>>;
}

impl<F: FileFetcher + ?Sized> FileFetcher for &F {
    fn fetch_files(
        &self,
        data_dir: &Path,
        files: &[FileSpec],
        resume: bool,
        verbose: u8,
    ) -> Result<Vec<PathBuf>> {
        (**self).fetch_files(data_dir, files, resume, verbose)
    }
}
