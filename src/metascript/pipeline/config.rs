//! Compile options and their loader
//!
//!     `defaults/compile.default.toml` is embedded into the library so the documented
//!     defaults and the runtime ones cannot drift apart. Callers layer their own TOML files
//!     and key overrides on top through [Loader] before deserializing into [CompileOptions].
//!
//!     A few named presets cover the usual ways of running the front end:
//!
//!         tokens  scan only
//!         layout  scan and insert virtual semicolons
//!         ast     the full pipeline (the default)

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../../defaults/compile.default.toml");

/// What a compile call runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Run the layout pass.
    pub insert_separators: bool,
    /// Parse into an AST. Implies `insert_separators`.
    pub build_tree: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::ast()
    }
}

impl CompileOptions {
    pub fn tokens() -> Self {
        Self {
            insert_separators: false,
            build_tree: false,
        }
    }

    pub fn layout() -> Self {
        Self {
            insert_separators: true,
            build_tree: false,
        }
    }

    pub fn ast() -> Self {
        Self {
            insert_separators: true,
            build_tree: true,
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "tokens" => Some(Self::tokens()),
            "layout" => Some(Self::layout()),
            "ast" => Some(Self::ast()),
            _ => None,
        }
    }

    pub fn preset_names() -> &'static [&'static str] {
        &["tokens", "layout", "ast"]
    }

    /// Whether the layout pass runs; building a tree needs it.
    pub fn runs_layout(&self) -> bool {
        self.insert_separators || self.build_tree
    }
}

/// Top-level shape of the configuration files.
#[derive(Debug, Clone, Deserialize)]
struct Settings {
    compile: CompileOptions,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer TOML text, e.g. a `[compile]` table from an embedding application.
    pub fn with_toml(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override such as `compile.build_tree`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting options.
    pub fn build(self) -> Result<CompileOptions, ConfigError> {
        let settings: Settings = self.builder.build()?.try_deserialize()?;
        Ok(settings.compile)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Options from the embedded defaults alone.
pub fn load_defaults() -> Result<CompileOptions, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_embedded_file() {
        assert_eq!(load_defaults().unwrap(), CompileOptions::default());
    }

    #[test]
    fn test_override() {
        let options = Loader::new()
            .set_override("compile.build_tree", false)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(options, CompileOptions::layout());
    }

    #[test]
    fn test_layered_toml_only_changes_named_keys() {
        let options = Loader::new()
            .with_toml("[compile]\ninsert_separators = false")
            .build()
            .unwrap();
        assert!(!options.insert_separators);
        assert!(options.build_tree);
        assert!(options.runs_layout());
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = Loader::new()
            .with_file("/nonexistent/metascript.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_optional_file_is_ignored() {
        let options = Loader::new()
            .with_optional_file("/nonexistent/metascript.toml")
            .build()
            .unwrap();
        assert_eq!(options, CompileOptions::ast());
    }

    #[test]
    fn test_presets() {
        for name in CompileOptions::preset_names() {
            assert!(CompileOptions::preset(name).is_some(), "{}", name);
        }
        assert_eq!(CompileOptions::preset("tokens"), Some(CompileOptions::tokens()));
        assert!(!CompileOptions::tokens().runs_layout());
        assert_eq!(CompileOptions::preset("html"), None);
    }
}
