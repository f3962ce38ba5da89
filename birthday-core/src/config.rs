//! Converter configuration.
//!
//! Everything the loader and writer need is resolved once into an immutable
//! `ConverterConfig` and passed in explicitly.

use std::path::{Path, PathBuf};

use ::config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{BirthdayError, BirthdayResult};
use crate::loader::LoaderOptions;

/// Directory next to the executable holding input and output calendars
pub const DATA_DIR: &str = "data";
pub const DEFAULT_INPUT_FILE: &str = "addressbook#contacts@group.v.calendar.google.com.ics";
pub const DEFAULT_OUTPUT_FILE: &str = "birthday_notifications.ics";
pub const DEFAULT_UID_SUFFIX: &str = "@google.com";

fn default_uid_suffix() -> String {
    DEFAULT_UID_SUFFIX.to_string()
}

/// Calendar-level properties of the generated calendar.
///
/// VERSION and CALSCALE are always `2.0` and `GREGORIAN` and are not
/// configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarMetadata {
    pub prodid: String,
    /// X-WR-CALNAME
    pub name: String,
    /// X-WR-TIMEZONE
    pub timezone: String,
    pub method: String,
}

impl Default for CalendarMetadata {
    fn default() -> Self {
        CalendarMetadata {
            prodid: "-//Birthday calendar//".to_string(),
            name: "Birthday Notifications".to_string(),
            timezone: "UTC".to_string(),
            method: "PUBLISH".to_string(),
        }
    }
}

/// Configuration for a single conversion run.
///
/// Read from `~/.config/birthday-notify/config.toml` (or an explicit file):
///
/// ```toml
/// input = "~/Downloads/contacts.ics"
/// output = "~/calendar/birthdays.ics"
/// uid_suffix = "@example.com"
///
/// [calendar]
/// name = "Family Birthdays"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConverterConfig {
    pub input: PathBuf,
    pub output: PathBuf,

    #[serde(default = "default_uid_suffix")]
    pub uid_suffix: String,

    #[serde(default)]
    pub calendar: CalendarMetadata,
}

impl ConverterConfig {
    /// Default config file location in the platform config directory.
    pub fn config_path() -> BirthdayResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| BirthdayError::Config("Could not determine config directory".into()))?
            .join("birthday-notify");

        Ok(config_dir.join("config.toml"))
    }

    /// The `data` directory next to the running executable.
    pub fn default_data_dir() -> BirthdayResult<PathBuf> {
        let exe = std::env::current_exe()?;
        let exe_dir = exe.parent().ok_or_else(|| {
            BirthdayError::Config(format!("Executable {} has no parent directory", exe.display()))
        })?;

        Ok(exe_dir.join(DATA_DIR))
    }

    /// Built-in defaults with both calendars inside `data_dir`.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        ConverterConfig {
            input: data_dir.join(DEFAULT_INPUT_FILE),
            output: data_dir.join(DEFAULT_OUTPUT_FILE),
            uid_suffix: default_uid_suffix(),
            calendar: CalendarMetadata::default(),
        }
    }

    /// Load configuration, defaulting paths to the executable's data directory.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&Path>) -> BirthdayResult<Self> {
        let data_dir = Self::default_data_dir()?;

        match config_file {
            Some(path) => Self::load_from(Some(path), &data_dir),
            None => {
                let default_path = Self::config_path()?;
                if default_path.exists() {
                    Self::load_from(Some(&default_path), &data_dir)
                } else {
                    Self::load_from(None, &data_dir)
                }
            }
        }
    }

    /// Load configuration from an optional file on top of defaults rooted at `data_dir`.
    pub fn load_from(config_file: Option<&Path>, data_dir: &Path) -> BirthdayResult<Self> {
        let defaults = Self::with_data_dir(data_dir);

        let mut builder = Config::builder()
            .set_default("input", defaults.input.to_string_lossy().into_owned())
            .and_then(|b| b.set_default("output", defaults.output.to_string_lossy().into_owned()))
            .map_err(|e| BirthdayError::Config(e.to_string()))?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        let mut config: ConverterConfig = builder
            .build()
            .map_err(|e| BirthdayError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| BirthdayError::Config(e.to_string()))?;

        config.input = expand_tilde(&config.input);
        config.output = expand_tilde(&config.output);

        Ok(config)
    }

    /// Override the input calendar path.
    pub fn with_input(mut self, input: PathBuf) -> Self {
        self.input = expand_tilde(&input);
        self
    }

    /// Override the output calendar path.
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = expand_tilde(&output);
        self
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            uid_suffix: self.uid_suffix.clone(),
        }
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
