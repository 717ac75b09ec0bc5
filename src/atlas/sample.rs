//! Synthetic archives laid out like the real atlas downloads.
//!
//! Images are placeholders; colour tables are valid and parse with
//! [`LabelTable::load`](crate::color::LabelTable::load). Serving these
//! archives through `file://` URLs exercises the whole fetch pipeline
//! without network access.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::registry::DatasetDescriptor;
use crate::color::{LabelColor, LabelTable};

/// Write `<out_dir>/<archive_dir>.zip` containing every file of `descriptor`.
pub fn write_sample_archive(descriptor: &DatasetDescriptor, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let path = out_dir.join(format!("{}.zip", descriptor.archive_dir));
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;

    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default();
    for basename in descriptor.basenames() {
        let name = format!("{}/{}", descriptor.archive_dir, basename);
        zip.start_file(name.as_str(), options)
            .with_context(|| format!("adding {name}"))?;
        zip.write_all(sample_content(basename).as_bytes())?;
    }
    zip.finish().context("finishing zip archive")?;

    Ok(path)
}

/// Body of one sample file, chosen by its name.
pub fn sample_content(basename: &str) -> String {
    let table = LabelTable::generated(label_count(basename));
    if basename.ends_with("ColorLUT.txt") {
        freesurfer_lut(&table)
    } else if basename.ends_with(".lut") {
        table
            .iter()
            .map(|l| {
                format!(
                    "{} {:.4} {:.4} {:.4} {}\n",
                    l.index,
                    f64::from(l.color.red) / 255.0,
                    f64::from(l.color.green) / 255.0,
                    f64::from(l.color.blue) / 255.0,
                    l.name
                )
            })
            .collect()
    } else if basename.ends_with(".tsv") {
        let rows: String = table
            .iter()
            .map(|l| format!("{}\t{}\t{}\n", l.index, l.name, l.hex()))
            .collect();
        format!("index\tname\tcolor\n{rows}")
    } else if basename.ends_with(".json") {
        serde_json::json!({
            "Name": basename,
            "Description": "synthetic sample atlas",
            "NumLabels": table.len(),
        })
        .to_string()
    } else {
        format!("placeholder for {basename}\n")
    }
}

fn label_count(basename: &str) -> usize {
    if basename.contains("17Networks") {
        17
    } else if basename.contains("7Networks") {
        7
    } else {
        10
    }
}

fn freesurfer_lut(table: &LabelTable) -> String {
    let none = LabelColor {
        index: 0,
        name: "NONE".to_string(),
        color: palette::Srgba::new(0, 0, 0, 255),
    };
    std::iter::once(&none)
        .chain(table.iter())
        .map(|l| {
            format!(
                "{:>3}  {:<24}{:>4}{:>4}{:>4}{:>4}\n",
                l.index,
                l.name,
                l.color.red,
                l.color.green,
                l.color.blue,
                255 - l.color.alpha
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::registry::{MDTB_ATLASES, YEO_2011};
    use crate::color::parse_lut;

    #[test]
    fn colour_files_parse_back() {
        let lut7 = parse_lut(&sample_content("Yeo2011_7Networks_ColorLUT.txt")).unwrap();
        assert_eq!(lut7.len(), 8);
        assert_eq!(lut7.get(0).unwrap().name, "NONE");

        let lut17 = parse_lut(&sample_content("Yeo2011_17Networks_ColorLUT.txt")).unwrap();
        assert_eq!(lut17.len(), 18);

        let mdtb = parse_lut(&sample_content("atl-MDTB10.lut")).unwrap();
        assert_eq!(mdtb.len(), 10);
        assert_eq!(mdtb.get(10).unwrap().name, "label-10");
    }

    #[test]
    fn archives_contain_every_declared_file() {
        let dir = tempfile::tempdir().unwrap();
        for desc in [&YEO_2011, &MDTB_ATLASES] {
            let path = write_sample_archive(desc, dir.path()).unwrap();
            let mut zip = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
            assert_eq!(zip.len(), desc.len());
            for basename in desc.basenames() {
                let name = format!("{}/{}", desc.archive_dir, basename);
                assert!(zip.by_name(&name).is_ok(), "{name} missing");
            }
        }
    }
}
