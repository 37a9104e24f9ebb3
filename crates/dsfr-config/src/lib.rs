//! Configuration management for the DSFR documentation tools.
//!
//! Parses `dsfr.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Every section is
//! optional: a missing file yields the defaults the tools have always used
//! (`wordpress-content-to-sort`, `tri.csv`, `mkdocs.yml` candidates, ...).
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields: every path in `[titles]`, `[sort]`, `[nav]` and `[theme]`.

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use expand::{expand_env, expand_opt};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dsfr.toml";

/// Default directory holding the WordPress export.
const DEFAULT_EXPORT_DIR: &str = "wordpress-content-to-sort";

/// Default site configuration locations, in lookup order.
const DEFAULT_MKDOCS_CANDIDATES: [&str; 3] =
    ["public/mkdocs.yml", "mkdocs.yml", "internal/mkdocs.yml"];

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
/// Paths given on the command line are used as-is (relative to the working
/// directory), not resolved against the config file location.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the export directory scanned by the title report.
    pub titles_base_dir: Option<PathBuf>,
    /// Override the title report output file.
    pub titles_output: Option<PathBuf>,
    /// Override the index filename read in each exported article.
    pub index_file: Option<String>,
    /// Override the export directory used as copy source by the sort job.
    pub sort_base_dir: Option<PathBuf>,
    /// Override the sort instruction table.
    pub instructions: Option<PathBuf>,
    /// Override the root under which destinations are created.
    pub dest_root: Option<PathBuf>,
    /// Use exactly this site configuration file.
    pub mkdocs_path: Option<PathBuf>,
    /// Override the documentation directory scanned for navigation.
    pub docs_dir: Option<PathBuf>,
    /// Override the theme directory.
    pub theme_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title report configuration (paths as strings from TOML).
    titles: TitlesConfigRaw,
    /// Sort job configuration (paths as strings from TOML).
    sort: SortConfigRaw,
    /// Navigation configuration (paths as strings from TOML).
    nav: NavConfigRaw,
    /// Theme configuration (paths as strings from TOML).
    theme: ThemeConfigRaw,

    /// Resolved title report configuration (set after loading).
    #[serde(skip)]
    pub titles_resolved: TitlesConfig,
    /// Resolved sort configuration (set after loading).
    #[serde(skip)]
    pub sort_resolved: SortConfig,
    /// Resolved navigation configuration (set after loading).
    #[serde(skip)]
    pub nav_resolved: NavConfig,
    /// Resolved theme configuration (set after loading).
    #[serde(skip)]
    pub theme_resolved: ThemeConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TitlesConfigRaw {
    base_dir: Option<String>,
    index_file: Option<String>,
    output: Option<String>,
}

/// Resolved title report configuration.
#[derive(Debug, Default)]
pub struct TitlesConfig {
    /// Directory whose subdirectories are exported articles.
    pub base_dir: PathBuf,
    /// Markdown file read inside each article directory.
    pub index_file: String,
    /// CSV file written by the report.
    pub output: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SortConfigRaw {
    base_dir: Option<String>,
    instructions: Option<String>,
    dest_root: Option<String>,
    columns: SortColumns,
}

/// Header names of the sort instruction table.
///
/// Headers are matched after trimming and case-insensitively, so the
/// historical `"Destination "` header (with a trailing space) still matches.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SortColumns {
    /// Human-readable article title.
    pub title: String,
    /// Current location in the old site (informational).
    pub current_path: String,
    /// Export directory, relative to the sort base directory.
    pub export_dir: String,
    /// Destination directory.
    pub destination: String,
}

impl Default for SortColumns {
    fn default() -> Self {
        Self {
            title: "Titre".to_owned(),
            current_path: "Chemin actuel".to_owned(),
            export_dir: "Répertoire d'export".to_owned(),
            destination: "Destination".to_owned(),
        }
    }
}

/// Resolved sort job configuration.
#[derive(Debug, Default)]
pub struct SortConfig {
    /// Directory containing the exported articles.
    pub base_dir: PathBuf,
    /// CSV instruction table.
    pub instructions: PathBuf,
    /// Root joined in front of every destination directory.
    pub dest_root: PathBuf,
    /// Instruction table header names.
    pub columns: SortColumns,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct NavConfigRaw {
    config_candidates: Option<Vec<String>>,
    docs_dir: Option<String>,
    extensions: Option<Vec<String>>,
    section_titles: BTreeMap<String, String>,
}

/// Resolved navigation configuration.
#[derive(Debug, Default)]
pub struct NavConfig {
    /// Site configuration files tried in order; the first existing one wins.
    pub config_candidates: Vec<PathBuf>,
    /// Documentation directory (`None`: read `docs_dir` from the site config).
    pub docs_dir: Option<PathBuf>,
    /// File extensions treated as documents (without the dot).
    pub extensions: Vec<String>,
    /// Extra section label overrides, applied on top of the built-in table.
    pub section_titles: BTreeMap<String, String>,
}

impl NavConfig {
    /// First candidate site configuration that exists on disk.
    #[must_use]
    pub fn find_site_config(&self) -> Option<&Path> {
        self.config_candidates
            .iter()
            .map(PathBuf::as_path)
            .find(|path| path.is_file())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ThemeConfigRaw {
    name: Option<String>,
    dir: Option<String>,
}

/// Resolved theme configuration.
#[derive(Debug, Default)]
pub struct ThemeConfig {
    /// Theme name the site configuration must select.
    pub name: String,
    /// Directory containing the theme package.
    pub dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`sort.base_dir`").
        field: String,
        /// Error message (e.g., "${`EXPORT_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dsfr.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_dir) = &settings.titles_base_dir {
            self.titles_resolved.base_dir.clone_from(base_dir);
        }
        if let Some(output) = &settings.titles_output {
            self.titles_resolved.output.clone_from(output);
        }
        if let Some(index_file) = &settings.index_file {
            self.titles_resolved.index_file.clone_from(index_file);
        }
        if let Some(base_dir) = &settings.sort_base_dir {
            self.sort_resolved.base_dir.clone_from(base_dir);
        }
        if let Some(instructions) = &settings.instructions {
            self.sort_resolved.instructions.clone_from(instructions);
        }
        if let Some(dest_root) = &settings.dest_root {
            self.sort_resolved.dest_root.clone_from(dest_root);
        }
        if let Some(mkdocs_path) = &settings.mkdocs_path {
            self.nav_resolved.config_candidates = vec![mkdocs_path.clone()];
        }
        if let Some(docs_dir) = &settings.docs_dir {
            self.nav_resolved.docs_dir = Some(docs_dir.clone());
        }
        if let Some(theme_dir) = &settings.theme_dir {
            self.theme_resolved.dir.clone_from(theme_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            titles: TitlesConfigRaw::default(),
            sort: SortConfigRaw::default(),
            nav: NavConfigRaw::default(),
            theme: ThemeConfigRaw::default(),
            titles_resolved: TitlesConfig::default(),
            sort_resolved: SortConfig::default(),
            nav_resolved: NavConfig::default(),
            theme_resolved: ThemeConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.titles_resolved.index_file, "titles.index_file")?;

        let columns = &self.sort_resolved.columns;
        require_non_empty(&columns.title, "sort.columns.title")?;
        require_non_empty(&columns.current_path, "sort.columns.current_path")?;
        require_non_empty(&columns.export_dir, "sort.columns.export_dir")?;
        require_non_empty(&columns.destination, "sort.columns.destination")?;

        self.validate_nav()?;

        require_non_empty(&self.theme_resolved.name, "theme.name")?;
        Ok(())
    }

    /// Validate navigation configuration.
    fn validate_nav(&self) -> Result<(), ConfigError> {
        if self.nav_resolved.config_candidates.is_empty() {
            return Err(ConfigError::Validation(
                "nav.config_candidates must list at least one file".to_owned(),
            ));
        }
        if self.nav_resolved.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "nav.extensions must list at least one extension".to_owned(),
            ));
        }
        for ext in &self.nav_resolved.extensions {
            require_non_empty(ext, "nav.extensions")?;
        }
        for (dir_name, label) in &self.nav_resolved.section_titles {
            require_non_empty(label, &format!("nav.section_titles.{dir_name}"))?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand_opt(&mut self.titles.base_dir, "titles.base_dir")?;
        expand_opt(&mut self.titles.output, "titles.output")?;
        expand_opt(&mut self.sort.base_dir, "sort.base_dir")?;
        expand_opt(&mut self.sort.instructions, "sort.instructions")?;
        expand_opt(&mut self.sort.dest_root, "sort.dest_root")?;
        expand_opt(&mut self.nav.docs_dir, "nav.docs_dir")?;
        expand_opt(&mut self.theme.dir, "theme.dir")?;

        if let Some(candidates) = self.nav.config_candidates.as_mut() {
            for candidate in candidates.iter_mut() {
                *candidate = expand_env(candidate, "nav.config_candidates")?;
            }
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.titles_resolved = TitlesConfig {
            base_dir: resolve(self.titles.base_dir.as_deref(), DEFAULT_EXPORT_DIR),
            index_file: self
                .titles
                .index_file
                .clone()
                .unwrap_or_else(|| "index.md".to_owned()),
            output: resolve(
                self.titles.output.as_deref(),
                "wordpress_articles_titles.csv",
            ),
        };

        self.sort_resolved = SortConfig {
            base_dir: resolve(self.sort.base_dir.as_deref(), DEFAULT_EXPORT_DIR),
            instructions: resolve(self.sort.instructions.as_deref(), "tri.csv"),
            dest_root: self
                .sort
                .dest_root
                .as_deref()
                .map_or_else(|| config_dir.to_path_buf(), |d| config_dir.join(d)),
            columns: self.sort.columns.clone(),
        };

        let config_candidates = match &self.nav.config_candidates {
            Some(candidates) => candidates.iter().map(|c| config_dir.join(c)).collect(),
            None => DEFAULT_MKDOCS_CANDIDATES
                .iter()
                .map(|c| config_dir.join(c))
                .collect(),
        };
        self.nav_resolved = NavConfig {
            config_candidates,
            docs_dir: self.nav.docs_dir.as_deref().map(|d| config_dir.join(d)),
            extensions: self
                .nav
                .extensions
                .clone()
                .unwrap_or_else(|| vec!["md".to_owned()]),
            section_titles: self.nav.section_titles.clone(),
        };

        self.theme_resolved = ThemeConfig {
            name: self.theme.name.clone().unwrap_or_else(|| "dsfr".to_owned()),
            dir: resolve(self.theme.dir.as_deref(), "public/mkdocs_dsfr"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.titles_resolved.base_dir,
            PathBuf::from("/test/wordpress-content-to-sort")
        );
        assert_eq!(config.titles_resolved.index_file, "index.md");
        assert_eq!(
            config.titles_resolved.output,
            PathBuf::from("/test/wordpress_articles_titles.csv")
        );
        assert_eq!(
            config.sort_resolved.instructions,
            PathBuf::from("/test/tri.csv")
        );
        assert_eq!(config.sort_resolved.columns, SortColumns::default());
        assert_eq!(
            config.nav_resolved.config_candidates,
            vec![
                PathBuf::from("/test/public/mkdocs.yml"),
                PathBuf::from("/test/mkdocs.yml"),
                PathBuf::from("/test/internal/mkdocs.yml"),
            ]
        );
        assert_eq!(config.nav_resolved.extensions, vec!["md".to_owned()]);
        assert!(config.nav_resolved.docs_dir.is_none());
        assert_eq!(config.theme_resolved.name, "dsfr");
        assert_eq!(
            config.theme_resolved.dir,
            PathBuf::from("/test/public/mkdocs_dsfr")
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert!(config.validate().is_ok());
        assert_eq!(config.sort_resolved.columns.destination, "Destination");
    }

    #[test]
    fn test_parse_sort_columns() {
        let toml = r#"
[sort]
instructions = "instructions/tri.csv"

[sort.columns]
destination = "Dossier cible"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.sort_resolved.instructions,
            PathBuf::from("/project/instructions/tri.csv")
        );
        assert_eq!(config.sort_resolved.columns.destination, "Dossier cible");
        assert_eq!(config.sort_resolved.columns.title, "Titre");
    }

    #[test]
    fn test_parse_nav_config() {
        let toml = r#"
[nav]
config_candidates = ["site/mkdocs.yml"]
docs_dir = "site/content"
extensions = ["md", "markdown"]

[nav.section_titles]
Api = "API"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.nav_resolved.config_candidates,
            vec![PathBuf::from("/project/site/mkdocs.yml")]
        );
        assert_eq!(
            config.nav_resolved.docs_dir,
            Some(PathBuf::from("/project/site/content"))
        );
        assert_eq!(
            config.nav_resolved.extensions,
            vec!["md".to_owned(), "markdown".to_owned()]
        );
        assert_eq!(
            config.nav_resolved.section_titles.get("Api"),
            Some(&"API".to_owned())
        );
    }

    #[test]
    fn test_apply_cli_settings_sort() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            sort_base_dir: Some(PathBuf::from("export")),
            instructions: Some(PathBuf::from("autre.csv")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.sort_resolved.base_dir, PathBuf::from("export"));
        assert_eq!(config.sort_resolved.instructions, PathBuf::from("autre.csv"));
        // Titles keep their own base directory
        assert_eq!(
            config.titles_resolved.base_dir,
            PathBuf::from("/test/wordpress-content-to-sort")
        );
    }

    #[test]
    fn test_apply_cli_settings_mkdocs_path_replaces_candidates() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            mkdocs_path: Some(PathBuf::from("site/mkdocs.yml")),
            docs_dir: Some(PathBuf::from("site/docs")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.nav_resolved.config_candidates,
            vec![PathBuf::from("site/mkdocs.yml")]
        );
        assert_eq!(
            config.nav_resolved.docs_dir,
            Some(PathBuf::from("site/docs"))
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(
            config.sort_resolved.base_dir,
            PathBuf::from("/test/wordpress-content-to-sort")
        );
        assert_eq!(config.nav_resolved.config_candidates.len(), 3);
    }

    #[test]
    fn test_validate_empty_extensions() {
        let toml = "[nav]\nextensions = []\n";
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("nav.extensions"));
    }

    #[test]
    fn test_validate_empty_theme_name() {
        let toml = "[theme]\nname = \"\"\n";
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("theme.name"));
    }

    #[test]
    fn test_validate_empty_section_title() {
        let toml = "[nav.section_titles]\nFaq = \" \"\n";
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("nav.section_titles.Faq"));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/dsfr.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_against_config_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("dsfr.toml");
        std::fs::write(
            &config_path,
            "[titles]\nbase_dir = \"export\"\n\n[theme]\ndir = \"theme\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();

        assert_eq!(config.titles_resolved.base_dir, temp_dir.path().join("export"));
        assert_eq!(config.theme_resolved.dir, temp_dir.path().join("theme"));
        assert_eq!(config.config_path, Some(config_path));
    }

    #[test]
    fn test_load_from_file_expands_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DSFR_CONFIG_TEST_EXPORT", "export-2024");
        }
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("dsfr.toml");
        std::fs::write(
            &config_path,
            "[sort]\nbase_dir = \"${DSFR_CONFIG_TEST_EXPORT}\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();

        assert_eq!(
            config.sort_resolved.base_dir,
            temp_dir.path().join("export-2024")
        );
        unsafe {
            std::env::remove_var("DSFR_CONFIG_TEST_EXPORT");
        }
    }

    #[test]
    fn test_find_site_config_returns_first_existing() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("mkdocs.yml"), "site_name: Test\n").unwrap();

        let config = Config::default_with_base(temp_dir.path());

        assert_eq!(
            config.nav_resolved.find_site_config(),
            Some(temp_dir.path().join("mkdocs.yml").as_path())
        );
    }

    #[test]
    fn test_find_site_config_none_when_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::default_with_base(temp_dir.path());
        assert!(config.nav_resolved.find_site_config().is_none());
    }
}
