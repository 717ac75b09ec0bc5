mod cli;

use anyhow::{Context, Result};
use atlas_fetch::atlas::{fetch_atlas, FetchOptions, REGISTRY};
use atlas_fetch::{AtlasBundle, HttpFetcher, LabelTable};
use clap::Parser;
use log::info;

use cli::{CliArgs, Command};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    match &args.command {
        Command::Fetch {
            atlas,
            data_dir,
            url,
            no_resume,
            json,
        } => {
            let options = FetchOptions {
                data_dir: data_dir.clone(),
                url: url.clone(),
                resume: !no_resume,
                verbose: args.verbosity(),
            };
            let fetcher = HttpFetcher::new().context("creating HTTP client")?;
            let bundle = fetch_atlas(atlas.descriptor(), &options, &fetcher)
                .with_context(|| format!("fetching atlas '{atlas}'"))?;
            info!("Fetched {} files for {atlas}", bundle.len());

            if *json {
                println!("{}", serde_json::to_string_pretty(&bundle)?);
            } else {
                print_bundle(&bundle);
            }
        }
        Command::List => {
            for desc in REGISTRY {
                println!("{}  ({})", desc.name, desc.default_url);
                for key in desc.keys() {
                    println!("    {key}");
                }
            }
        }
        Command::Labels { path } => {
            let table = LabelTable::load(path)
                .with_context(|| format!("loading colour table {}", path.display()))?;
            for label in table.iter() {
                println!(
                    "{:>4}  {}  {:>3}  {}",
                    label.index,
                    label.hex(),
                    label.color.alpha,
                    label.name
                );
            }
        }
    }

    Ok(())
}

fn print_bundle(bundle: &AtlasBundle) {
    let width = bundle.files().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, path) in bundle.files() {
        println!("{key:<width$}  {}", path.display());
    }
    if let Some(title) = bundle.description().lines().find(|l| !l.trim().is_empty()) {
        println!();
        println!("{}", title.trim());
    }
}
