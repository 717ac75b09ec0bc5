use log::warn;

/// Dataset name → bundled description text.
const DESCRIPTIONS: &[(&str, &str)] = &[
    ("yeo_2011", include_str!("../../descr/yeo_2011.rst")),
    ("mdbt_atlases_2019", include_str!("../../descr/mdbt_atlases_2019.rst")),
];

/// Static description for `dataset_name`.
///
/// Unknown names are not an error: a warning is logged and the description
/// is empty.
pub fn dataset_description(dataset_name: &str) -> String {
    match DESCRIPTIONS.iter().find(|(name, _)| *name == dataset_name) {
        Some((_, text)) => (*text).to_string(),
        None => {
            warn!("No description available for dataset '{dataset_name}'");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::registry::REGISTRY;

    #[test]
    fn every_registered_dataset_has_a_description() {
        for desc in REGISTRY {
            assert!(
                !dataset_description(desc.name).trim().is_empty(),
                "{} has no description",
                desc.name
            );
        }
    }

    #[test]
    fn unknown_dataset_is_empty() {
        assert_eq!(dataset_description("no_such_atlas"), "");
    }
}
