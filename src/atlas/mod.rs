/// Atlas layer: dataset descriptors, fetch entry points and result bundles.
///
/// Architecture:
/// ```text
///   fetch_atlas_yeo_2011 / fetch_atlas_mdtb
///        │
///        ▼
///   ┌──────────┐
///   │ registry  │  DatasetDescriptor: name, default URL, (key, basename) pairs
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  fetch    │  url → [FileSpec] → FileFetcher → [PathBuf]
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  bundle   │  description + key → path, in declaration order
///   └──────────┘
/// ```

pub mod bundle;
pub mod fetch;
pub mod registry;
pub mod sample;

pub use bundle::{AtlasBundle, DESCRIPTION_KEY};
pub use fetch::{
    fetch_atlas, fetch_atlas_mdtb, fetch_atlas_mdtb_with, fetch_atlas_yeo_2011,
    fetch_atlas_yeo_2011_with, file_specs, FetchOptions,
};
pub use registry::{lookup, Atlas, DatasetDescriptor, Resource, MDTB_ATLASES, REGISTRY, YEO_2011};
