//! Fetch neuroimaging atlases into a local cache and get back the paths of
//! their files.
//!
//! ```no_run
//! let atlas = atlas_fetch::fetch_atlas_mdtb(None, None, true, 1)?;
//! println!("{}", atlas.get("MDTB-SUIT").unwrap().display());
//! # Ok::<(), atlas_fetch::FetchError>(())
//! ```

pub mod atlas;
pub mod color;
pub mod error;
pub mod fetch;

pub use atlas::{
    fetch_atlas, fetch_atlas_mdtb, fetch_atlas_mdtb_with, fetch_atlas_yeo_2011,
    fetch_atlas_yeo_2011_with, Atlas, AtlasBundle, DatasetDescriptor, FetchOptions,
};
pub use color::{LabelColor, LabelTable};
pub use error::FetchError;
pub use fetch::{FileFetcher, FileOptions, FileSpec, HttpFetcher};
