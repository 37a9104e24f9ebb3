//! Section labels derived from directory names.

use std::collections::BTreeMap;

use dsfr_meta::title_from_name;

/// Curated labels for well-known directories.
///
/// Keys are matched against the raw directory name first, then against the
/// derived title-cased label (`faq` -> `Faq` -> `FAQ`).
const DEFAULT_SECTION_TITLES: &[(&str, &str)] = &[
    ("How-To", "Guides"),
    ("how-to", "Guides"),
    ("Reference", "Référence"),
    ("Explanation", "Explications"),
    ("Tutorials", "Tutoriels"),
    ("Faq", "FAQ"),
    ("Cloudpi", "Cloud Pi Gen 2"),
    ("Kubepi", "Kube Pi"),
    ("Cpin", "Cloud Pi Native"),
];

/// Directory name to section label lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTitles {
    overrides: BTreeMap<String, String>,
}

impl Default for SectionTitles {
    fn default() -> Self {
        Self {
            overrides: DEFAULT_SECTION_TITLES
                .iter()
                .map(|(key, label)| ((*key).to_owned(), (*label).to_owned()))
                .collect(),
        }
    }
}

impl SectionTitles {
    /// Built-in table extended (or overridden) by `extra` entries.
    pub fn with_overrides(extra: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut titles = Self::default();
        titles.overrides.extend(extra);
        titles
    }

    /// Label for a section directory.
    pub fn label(&self, dir_name: &str) -> String {
        if let Some(label) = self.overrides.get(dir_name) {
            return label.clone();
        }
        let derived = title_from_name(dir_name);
        self.overrides.get(&derived).cloned().unwrap_or(derived)
    }
}
