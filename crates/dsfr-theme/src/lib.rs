//! DSFR theme registration for MkDocs sites.
//!
//! [`Theme`] describes the theme package on disk. A [`ThemeContext`] is built
//! once per run and handed to the [`on_config`] hook, which reports where the
//! theme and its templates live and passes the site configuration through.
//! [`check_site_config`] verifies that a `mkdocs.yml` actually selects the
//! theme.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

/// Name under which the theme registers.
pub const THEME_NAME: &str = "dsfr";

/// Templates rendered as standalone pages rather than per document.
pub const STATIC_TEMPLATES: &[&str] = &["404.html", "sitemap.xml", "sitemap.xml.template"];

const TEMPLATES_DIR: &str = "templates";

/// Error returned by theme checks.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Site configuration not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    #[error("Invalid site configuration {}: {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Theme package descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub static_templates: Vec<String>,
    /// Theme package directory.
    pub dir: PathBuf,
}

impl Theme {
    /// The DSFR theme installed in `dir`.
    pub fn dsfr(dir: impl Into<PathBuf>) -> Self {
        Self::named(THEME_NAME, dir)
    }

    pub fn named(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            static_templates: STATIC_TEMPLATES.iter().map(|t| (*t).to_owned()).collect(),
            dir: dir.into(),
        }
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.dir.join(TEMPLATES_DIR)
    }

    /// Static templates absent from the templates directory.
    pub fn missing_templates(&self) -> Vec<&str> {
        let templates_dir = self.templates_dir();
        self.static_templates
            .iter()
            .filter(|name| !templates_dir.join(name.as_str()).is_file())
            .map(String::as_str)
            .collect()
    }
}

/// State shared by the hooks of one build.
#[derive(Debug, Clone)]
pub struct ThemeContext {
    theme: Theme,
}

impl ThemeContext {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

/// Configuration hook: logs the theme location and returns `config` as is.
pub fn on_config(config: Value, context: &ThemeContext) -> Value {
    let theme = context.theme();
    tracing::info!(theme = %theme.name, path = %theme.dir.display(), "Theme location");
    tracing::info!(path = %theme.templates_dir().display(), "Theme templates");
    config
}

/// Theme selected by a site configuration.
///
/// MkDocs accepts either `theme: name` or a mapping with `name` and/or
/// `custom_dir`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeSelection {
    pub name: Option<String>,
    pub custom_dir: Option<String>,
}

impl ThemeSelection {
    pub fn from_config(config: &Value) -> Option<Self> {
        match config.get("theme")? {
            Value::String(name) => Some(Self {
                name: Some(name.clone()),
                custom_dir: None,
            }),
            theme @ Value::Mapping(_) => {
                let field = |key: &str| theme.get(key).and_then(Value::as_str).map(str::to_owned);
                Some(Self {
                    name: field("name"),
                    custom_dir: field("custom_dir"),
                })
            }
            _ => None,
        }
    }

    /// Whether this selection loads `theme`, by name or by custom directory.
    pub fn selects(&self, theme: &Theme, config_dir: &Path) -> bool {
        if self.name.as_deref() == Some(theme.name.as_str()) {
            return true;
        }
        self.custom_dir
            .as_deref()
            .is_some_and(|dir| same_dir(&config_dir.join(dir), &theme.dir))
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Outcome of [`check_site_config`].
#[derive(Debug)]
pub struct ThemeReport {
    pub config_path: PathBuf,
    pub selection: Option<ThemeSelection>,
    /// Whether the site configuration loads the theme.
    pub selected: bool,
    pub theme_dir_exists: bool,
    pub missing_templates: Vec<String>,
}

/// Check a site configuration against the theme in `context`.
///
/// Runs the [`on_config`] hook on the parsed configuration.
///
/// # Errors
///
/// Returns an error if the file is missing or not a YAML mapping.
pub fn check_site_config(
    config_path: &Path,
    context: &ThemeContext,
) -> Result<ThemeReport, ThemeError> {
    let content = fs::read_to_string(config_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ThemeError::ConfigNotFound(config_path.to_path_buf()),
        _ => ThemeError::Io(e),
    })?;
    let config: Value = serde_yaml::from_str(&content).map_err(|e| ThemeError::InvalidConfig {
        path: config_path.to_path_buf(),
        message: e.to_string(),
    })?;
    if !config.is_mapping() {
        return Err(ThemeError::InvalidConfig {
            path: config_path.to_path_buf(),
            message: "top level is not a mapping".to_owned(),
        });
    }

    let config = on_config(config, context);
    let theme = context.theme();
    let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let selection = ThemeSelection::from_config(&config);
    let selected = selection
        .as_ref()
        .is_some_and(|s| s.selects(theme, config_dir));
    if !selected {
        tracing::warn!(path = %config_path.display(), theme = %theme.name, "Theme not selected");
    }

    Ok(ThemeReport {
        config_path: config_path.to_path_buf(),
        selection,
        selected,
        theme_dir_exists: theme.dir.is_dir(),
        missing_templates: theme
            .missing_templates()
            .into_iter()
            .map(str::to_owned)
            .collect(),
    })
}
