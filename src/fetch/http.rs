use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::header::RANGE;
use reqwest::StatusCode;
use url::Url;

use super::extract::uncompress;
use super::ftp;
use super::{FileFetcher, FileSpec};
use crate::error::{FetchError, Result};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const PART_SUFFIX: &str = ".part";

// ---------------------------------------------------------------------------
// HttpFetcher
// ---------------------------------------------------------------------------

/// Default [`FileFetcher`]: downloads over HTTP(S) and FTP or copies
/// `file://` URLs, resumes partial downloads and unpacks archives.
///
/// Files already present in the dataset directory are returned without any
/// network access.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    connect_timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::default()
    }

    /// Make `spec` available under `data_dir` and return its local path.
    fn fetch_one(&self, data_dir: &Path, spec: &FileSpec, resume: bool, verbose: u8) -> Result<PathBuf> {
        let target = data_dir.join(&spec.relative_path);
        if target.exists() {
            if verbose > 1 {
                debug!("Found cached file {}", target.display());
            }
            return Ok(target);
        }

        let url = Url::parse(&spec.url).map_err(|source| FetchError::InvalidUrl {
            url: spec.url.clone(),
            source,
        })?;
        let downloaded = data_dir.join(download_name(&url));

        match url.scheme() {
            "http" | "https" => self.download(&url, &downloaded, resume, verbose)?,
            "ftp" => ftp::download(&url, &downloaded, resume, verbose, self.connect_timeout)?,
            "file" => copy_local(&url, &downloaded, verbose)?,
            other => {
                return Err(FetchError::UnsupportedScheme {
                    url: spec.url.clone(),
                    scheme: other.to_string(),
                });
            }
        }

        if spec.options.uncompress {
            uncompress(&downloaded, data_dir, verbose)?;
        } else if downloaded != target {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| FetchError::io(parent, e))?;
            }
            fs::rename(&downloaded, &target).map_err(|e| FetchError::io(&target, e))?;
        }

        if !target.exists() {
            return Err(FetchError::MissingFile {
                path: target,
                url: spec.url.clone(),
            });
        }
        Ok(target)
    }

    /// Stream `url` into `dest` through a `.part` file.
    fn download(&self, url: &Url, dest: &Path, resume: bool, verbose: u8) -> Result<()> {
        let part = part_path(dest);
        let mut offset = match fs::metadata(&part) {
            Ok(meta) if resume => meta.len(),
            Ok(_) => {
                fs::remove_file(&part).map_err(|e| FetchError::io(&part, e))?;
                0
            }
            Err(_) => 0,
        };

        let mut request = self.client.get(url.clone());
        if offset > 0 {
            if verbose > 0 {
                info!("Resuming download of {url} at byte {offset}");
            }
            request = request.header(RANGE, format!("bytes={offset}-"));
        } else if verbose > 0 {
            info!("Downloading data from {url} ...");
        }

        let mut response = request.send()?;
        let status = response.status();
        if offset > 0 && status == StatusCode::RANGE_NOT_SATISFIABLE {
            warn!(
                "{url} rejected the range from byte {offset}; keeping {} as the complete download",
                part.display()
            );
            fs::rename(&part, dest).map_err(|e| FetchError::io(dest, e))?;
            return Ok(());
        }
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }
        if offset > 0 && status != StatusCode::PARTIAL_CONTENT {
            if verbose > 1 {
                debug!("Server ignored the range request, restarting {url}");
            }
            offset = 0;
        }

        let mut file = if offset > 0 {
            OpenOptions::new().append(true).open(&part)
        } else {
            File::create(&part)
        }
        .map_err(|e| FetchError::io(&part, e))?;

        let written = io::copy(&mut response, &mut file).map_err(|e| FetchError::io(&part, e))?;
        drop(file);
        fs::rename(&part, dest).map_err(|e| FetchError::io(dest, e))?;

        if verbose > 0 {
            info!("...done. ({} bytes)", offset + written);
        }
        Ok(())
    }
}

impl FileFetcher for HttpFetcher {
    fn fetch_files(
        &self,
        data_dir: &Path,
        files: &[FileSpec],
        resume: bool,
        verbose: u8,
    ) -> Result<Vec<PathBuf>> {
        files
            .iter()
            .map(|spec| self.fetch_one(data_dir, spec, resume, verbose))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HttpFetcherBuilder {
    connect_timeout: Duration,
    timeout: Option<Duration>,
    user_agent: String,
}

impl Default for HttpFetcherBuilder {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpFetcherBuilder {
    /// Limit for establishing HTTP and FTP connections.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Whole-request cap, body included. Unset by default so large archives
    /// on slow links are not cut off.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<HttpFetcher> {
        let client = Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()?;
        Ok(HttpFetcher {
            client,
            connect_timeout: self.connect_timeout,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// File name a URL is saved under: its last non-empty path segment.
fn download_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| "download".to_string())
}

pub(crate) fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

fn copy_local(url: &Url, dest: &Path, verbose: u8) -> Result<()> {
    let source = url.to_file_path().map_err(|()| FetchError::UnsupportedScheme {
        url: url.to_string(),
        scheme: "file (non-local host)".to_string(),
    })?;
    if verbose > 0 {
        info!("Copying data from {} ...", source.display());
    }
    fs::copy(&source, dest).map_err(|e| FetchError::io(&source, e))?;
    Ok(())
}
