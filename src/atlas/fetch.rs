use std::path::{Path, PathBuf};

use log::debug;

use super::bundle::AtlasBundle;
use super::registry::{DatasetDescriptor, MDTB_ATLASES, YEO_2011};
use crate::error::{FetchError, Result};
use crate::fetch::{dataset_description, dataset_dir, FileFetcher, FileOptions, FileSpec, HttpFetcher};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Caller-facing knobs shared by every atlas fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Cache root; the dataset lives in `<data_dir>/<dataset name>`.
    pub data_dir: Option<PathBuf>,
    /// Archive URL replacing the dataset default.
    pub url: Option<String>,
    /// Continue partially downloaded archives instead of restarting them.
    pub resume: bool,
    /// 0 is silent.
    pub verbose: u8,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            data_dir: None,
            url: None,
            resume: true,
            verbose: 1,
        }
    }
}

impl FetchOptions {
    fn from_args(data_dir: Option<&Path>, url: Option<&str>, resume: bool, verbose: u8) -> Self {
        Self {
            data_dir: data_dir.map(Path::to_path_buf),
            url: url.map(str::to_string),
            resume,
            verbose,
        }
    }
}

// ---------------------------------------------------------------------------
// Generic fetch
// ---------------------------------------------------------------------------

/// File specs for `descriptor`, every one pointing at `url`.
pub fn file_specs(descriptor: &DatasetDescriptor, url: &str) -> Vec<FileSpec> {
    let options = FileOptions {
        uncompress: descriptor.uncompress,
    };
    descriptor
        .basenames()
        .map(|basename| FileSpec::new(Path::new(descriptor.archive_dir).join(basename), url, options))
        .collect()
}

/// Fetch the files of `descriptor` through `fetcher` and bundle them with
/// the dataset description.
///
/// Errors from the directory resolver and the fetcher are returned as they
/// are. The only check made here is that the fetcher returned one path per
/// declared file, so keys can never be paired with the wrong file.
pub fn fetch_atlas<F>(descriptor: &DatasetDescriptor, options: &FetchOptions, fetcher: &F) -> Result<AtlasBundle>
where
    F: FileFetcher + ?Sized,
{
    let url = options.url.as_deref().unwrap_or(descriptor.default_url);
    let files = file_specs(descriptor, url);

    let data_dir = dataset_dir(descriptor.name, options.data_dir.as_deref(), options.verbose)?;
    let paths = fetcher.fetch_files(&data_dir, &files, options.resume, options.verbose)?;

    if paths.len() != files.len() {
        return Err(FetchError::PathCountMismatch {
            dataset: descriptor.name.to_string(),
            expected: files.len(),
            actual: paths.len(),
        });
    }
    if options.verbose > 1 {
        debug!("Fetched {} files for {}", paths.len(), descriptor.name);
    }

    let description = dataset_description(descriptor.name);
    Ok(AtlasBundle::new(description, descriptor.keys(), paths))
}

// ---------------------------------------------------------------------------
// Per-atlas entry points
// ---------------------------------------------------------------------------

/// Download and return file names for the Yeo 2011 parcellation.
///
/// The images are in MNI152 space. Bundle keys:
/// * `thin_7`, `thick_7` – 7-network parcellations fitted to the thin and
///   thick (liberal) cortical masks
/// * `thin_17`, `thick_17` – the same for 17 networks
/// * `colors_7`, `colors_17` – colour lookup tables of both parcellations
/// * `anat` – anatomical template
/// * `description`
///
/// `data_dir` defaults to [`default_data_root`](crate::fetch::cache::default_data_root),
/// `url` to [`YEO_2011`]`.default_url`.
pub fn fetch_atlas_yeo_2011(
    data_dir: Option<&Path>,
    url: Option<&str>,
    resume: bool,
    verbose: u8,
) -> Result<AtlasBundle> {
    let fetcher = HttpFetcher::new()?;
    fetch_atlas_yeo_2011_with(&fetcher, data_dir, url, resume, verbose)
}

/// [`fetch_atlas_yeo_2011`] with a caller-provided fetcher.
pub fn fetch_atlas_yeo_2011_with<F: FileFetcher + ?Sized>(
    fetcher: &F,
    data_dir: Option<&Path>,
    url: Option<&str>,
    resume: bool,
    verbose: u8,
) -> Result<AtlasBundle> {
    let options = FetchOptions::from_args(data_dir, url, resume, verbose);
    fetch_atlas(&YEO_2011, &options, fetcher)
}

/// Download and return file names for the MDTB cerebellar parcellation.
///
/// Bundle keys: `color-lut`, `color-tsv`, `MDTB-gifti`, `MDTB-MNI`,
/// `MDTB-SUIT`, `MDTB-descript` and `description`.
pub fn fetch_atlas_mdtb(
    data_dir: Option<&Path>,
    url: Option<&str>,
    resume: bool,
    verbose: u8,
) -> Result<AtlasBundle> {
    let fetcher = HttpFetcher::new()?;
    fetch_atlas_mdtb_with(&fetcher, data_dir, url, resume, verbose)
}

/// [`fetch_atlas_mdtb`] with a caller-provided fetcher.
pub fn fetch_atlas_mdtb_with<F: FileFetcher + ?Sized>(
    fetcher: &F,
    data_dir: Option<&Path>,
    url: Option<&str>,
    resume: bool,
    verbose: u8,
) -> Result<AtlasBundle> {
    let options = FetchOptions::from_args(data_dir, url, resume, verbose);
    fetch_atlas(&MDTB_ATLASES, &options, fetcher)
}
