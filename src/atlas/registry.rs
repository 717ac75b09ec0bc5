use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;

// ---------------------------------------------------------------------------
// Descriptor records
// ---------------------------------------------------------------------------

/// One file inside a dataset archive: the logical key it is published under
/// and its basename inside the archive folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub key: &'static str,
    pub basename: &'static str,
}

const fn res(key: &'static str, basename: &'static str) -> Resource {
    Resource { key, basename }
}

/// Immutable description of a downloadable atlas.
///
/// Keys and basenames are stored pairwise in `resources`, so every logical
/// key has exactly one file and the order of the pairs is the order of the
/// paths handed back by the fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetDescriptor {
    /// Cache sub-directory and description lookup key.
    pub name: &'static str,
    /// Archive used when the caller does not supply a URL.
    pub default_url: &'static str,
    /// Folder the archive unpacks into; every basename lives below it.
    pub archive_dir: &'static str,
    pub resources: &'static [Resource],
    /// Ask the fetcher to unpack the downloaded archive.
    pub uncompress: bool,
}

impl DatasetDescriptor {
    /// Logical keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.iter().map(|r| r.key)
    }

    pub fn basenames(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.iter().map(|r| r.basename)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Yeo et al. 2011 cortical parcellations in MNI152 space.
pub const YEO_2011: DatasetDescriptor = DatasetDescriptor {
    name: "yeo_2011",
    default_url: "ftp://surfer.nmr.mgh.harvard.edu/pub/data/Yeo_JNeurophysiol11_MNI152.zip",
    archive_dir: "Yeo_JNeurophysiol11_MNI152",
    resources: &[
        res("thin_7", "Yeo2011_7Networks_MNI152_FreeSurferConformed1mm.nii.gz"),
        res(
            "thick_7",
            "Yeo2011_7Networks_MNI152_FreeSurferConformed1mm_LiberalMask.nii.gz",
        ),
        res("thin_17", "Yeo2011_17Networks_MNI152_FreeSurferConformed1mm.nii.gz"),
        res(
            "thick_17",
            "Yeo2011_17Networks_MNI152_FreeSurferConformed1mm_LiberalMask.nii.gz",
        ),
        res("colors_7", "Yeo2011_7Networks_ColorLUT.txt"),
        res("colors_17", "Yeo2011_17Networks_ColorLUT.txt"),
        res("anat", "FSL_MNI152_FreeSurferConformed_1mm.nii.gz"),
    ],
    uncompress: true,
};

/// King et al. 2019 multi-domain task battery (MDTB) cerebellar parcellation.
///
/// The dataset name keeps the historical `mdbt` spelling so existing caches
/// stay valid.
pub const MDTB_ATLASES: DatasetDescriptor = DatasetDescriptor {
    name: "mdbt_atlases_2019",
    default_url: "http://github.com/DiedrichsenLab/cerebellar_atlases/atl-MDTB",
    archive_dir: "atl-MDTB",
    resources: &[
        res("color-lut", "atl-MDTB10.lut"),
        res("color-tsv", "atl-MDTB10.tsv"),
        res("MDTB-gifti", "atl-MDTB10_dseg.label.gii"),
        res("MDTB-MNI", "atl-MDTB10_space-MNI_dseg.nii"),
        res("MDTB-SUIT", "atl-MDTB10_space-SUIT_dseg.nii"),
        res("MDTB-descript", "atlas_description.json"),
    ],
    uncompress: true,
};

/// All registered atlases.
pub const REGISTRY: &[&DatasetDescriptor] = &[&YEO_2011, &MDTB_ATLASES];

/// Find a descriptor by its dataset name (`yeo_2011`, `mdbt_atlases_2019`).
pub fn lookup(dataset_name: &str) -> Result<&'static DatasetDescriptor, FetchError> {
    REGISTRY
        .iter()
        .copied()
        .find(|d| d.name == dataset_name)
        .ok_or_else(|| FetchError::UnknownDataset(dataset_name.to_string()))
}

// ---------------------------------------------------------------------------
// Atlas – user-facing variant names
// ---------------------------------------------------------------------------

/// Atlases that can be fetched, by their short command-line name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Atlas {
    Yeo2011,
    Mdtb,
}

impl Atlas {
    pub const ALL: [Atlas; 2] = [Atlas::Yeo2011, Atlas::Mdtb];

    pub fn descriptor(self) -> &'static DatasetDescriptor {
        match self {
            Atlas::Yeo2011 => &YEO_2011,
            Atlas::Mdtb => &MDTB_ATLASES,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Atlas::Yeo2011 => "yeo-2011",
            Atlas::Mdtb => "mdtb",
        }
    }
}

impl fmt::Display for Atlas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Atlas {
    type Err = FetchError;

    /// Accepts the short name or the dataset name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yeo-2011" | "yeo2011" | "yeo_2011" | "yeo" => Ok(Atlas::Yeo2011),
            "mdtb" | "mdbt_atlases_2019" => Ok(Atlas::Mdtb),
            _ => Err(FetchError::UnknownDataset(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names_are_unique() {
        for (i, a) in REGISTRY.iter().enumerate() {
            for b in &REGISTRY[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn keys_are_unique_within_each_dataset() {
        for desc in REGISTRY {
            let keys: Vec<_> = desc.keys().collect();
            for (i, k) in keys.iter().enumerate() {
                assert!(!keys[i + 1..].contains(k), "{k} repeated in {}", desc.name);
                assert_ne!(*k, "description");
            }
        }
    }

    #[test]
    fn declared_sizes() {
        assert_eq!(YEO_2011.len(), 7);
        assert_eq!(MDTB_ATLASES.len(), 6);
    }

    #[test]
    fn lookup_by_dataset_name() {
        assert_eq!(lookup("yeo_2011").unwrap().name, YEO_2011.name);
        assert_eq!(lookup("mdbt_atlases_2019").unwrap().name, MDTB_ATLASES.name);
        assert!(matches!(
            lookup("harvard_oxford"),
            Err(FetchError::UnknownDataset(_))
        ));
    }

    #[test]
    fn atlas_parses_short_and_dataset_names() {
        assert_eq!("yeo-2011".parse::<Atlas>().unwrap(), Atlas::Yeo2011);
        assert_eq!("YEO_2011".parse::<Atlas>().unwrap(), Atlas::Yeo2011);
        assert_eq!("mdtb".parse::<Atlas>().unwrap(), Atlas::Mdtb);
        assert!("msdl".parse::<Atlas>().is_err());
        for atlas in Atlas::ALL {
            assert_eq!(atlas.to_string().parse::<Atlas>().unwrap(), atlas);
        }
    }
}
