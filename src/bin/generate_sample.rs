use std::path::PathBuf;

use anyhow::{Context, Result};
use atlas_fetch::atlas::sample::write_sample_archive;
use atlas_fetch::atlas::REGISTRY;
use log::info;
use url::Url;

/// Write one synthetic archive per registered atlas into the directory given
/// as first argument (default `./sample_atlases`) and print the `file://`
/// URL to pass to `atlas-fetch fetch --url`.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_atlases"));
    let out_dir = std::path::absolute(&out_dir)
        .with_context(|| format!("resolving {}", out_dir.display()))?;

    for desc in REGISTRY {
        let path = write_sample_archive(desc, &out_dir)
            .with_context(|| format!("writing sample archive for {}", desc.name))?;
        let url = Url::from_file_path(&path)
            .map_err(|()| anyhow::anyhow!("{} is not an absolute path", path.display()))?;
        info!("Wrote {} ({} files)", path.display(), desc.len());
        println!("{}\t{url}", desc.name);
    }

    Ok(())
}
