//! Config file loading and creation for the wilsonci CLI.
//!
//! Config lives at ~/.config/wilsonci/config.toml.
//! All fields are optional; CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use wilsonci_core::{DEFAULT_MULTI_SELECT_DELIMITER, QuestionKind, QuestionSchema};

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WilsonciConfig {
    pub confidence_level: Option<f64>,
    pub digits: Option<usize>,
    pub continuity_correction: Option<bool>,
    /// Columns whose cells list several options.
    #[serde(default)]
    pub multi_select: Vec<String>,
    pub multi_select_delimiter: Option<char>,
    /// Columns holding open-ended answers; never tallied.
    #[serde(default)]
    pub free_text: Vec<String>,
    /// Non-question columns such as respondent ids.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl WilsonciConfig {
    /// Combine the config's column lists with the ones given on the command line.
    ///
    /// Lists are concatenated; a delimiter from the CLI replaces the config's.
    pub fn column_roles(
        &self,
        multi_select: &[String],
        free_text: &[String],
        ignore: &[String],
        delimiter: Option<char>,
    ) -> ColumnRoles {
        let concat = |base: &[String], extra: &[String]| -> Vec<String> { base.iter().chain(extra).cloned().collect() };
        ColumnRoles {
            multi_select: concat(&self.multi_select, multi_select),
            free_text: concat(&self.free_text, free_text),
            ignore: concat(&self.ignore, ignore),
            delimiter: delimiter
                .or(self.multi_select_delimiter)
                .unwrap_or(DEFAULT_MULTI_SELECT_DELIMITER),
        }
    }
}

/// What each non-categorical column of the response CSV is.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRoles {
    pub multi_select: Vec<String>,
    pub free_text: Vec<String>,
    pub ignore: Vec<String>,
    pub delimiter: char,
}

impl ColumnRoles {
    /// Later roles win if a column is listed twice: ignore > free text > multi-select.
    pub fn to_schema(&self) -> QuestionSchema {
        let mut schema = QuestionSchema::new();
        for q in &self.multi_select {
            schema.set(q.as_str(), QuestionKind::MultiSelect { delimiter: self.delimiter });
        }
        for q in &self.free_text {
            schema.set(q.as_str(), QuestionKind::FreeText);
        }
        for q in &self.ignore {
            schema.set(q.as_str(), QuestionKind::Ignored);
        }
        schema
    }

    /// Configured columns the response file does not have.
    pub fn missing_from<'a>(&'a self, question_ids: &[String]) -> Vec<&'a str> {
        self.multi_select
            .iter()
            .chain(&self.free_text)
            .chain(&self.ignore)
            .filter(|q| !question_ids.contains(q))
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Failed to parse config at {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("Config file already exists at {0}")]
    AlreadyExists(PathBuf),
    #[error("Failed to write config to {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# wilsonci configuration
# All values here can be overridden by CLI flags.

# Confidence level for every interval (open interval 0..1)
# confidence_level = 0.95

# Decimal digits in the interval table
# digits = 2

# Apply the continuity correction to the Wilson interval
# continuity_correction = false

# Columns of the response CSV that hold multi-select answers,
# and the character separating selected options within a cell
# multi_select = [\"Q13\", \"Q14\"]
# multi_select_delimiter = \";\"

# Open-ended answer columns (skipped when summarizing)
# free_text = [\"Q18\"]

# Columns that are not questions at all
# ignore = [\"respondent_id\"]
";

/// ~/.config/wilsonci/config.toml, or `None` when HOME is unset.
pub fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config").join("wilsonci").join("config.toml"))
}

/// A missing file is not an error: every field then takes its default.
pub fn load_config(path: &Path) -> Result<WilsonciConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(WilsonciConfig::default()),
        Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
    };
    toml::from_str(&content).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

/// Write the commented template to `path`, creating parent directories.
/// Never overwrites an existing file.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    let write_err = |source| ConfigError::Write { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<WilsonciConfig, toml::de::Error> {
        toml::from_str(content)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_template_parses_to_defaults() {
        assert_eq!(parse(DEFAULT_CONFIG_TEMPLATE).unwrap(), WilsonciConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let cfg = parse(
            "confidence_level = 0.9\n\
             digits = 1\n\
             continuity_correction = true\n\
             multi_select = [\"Q14\"]\n\
             multi_select_delimiter = \"|\"\n\
             free_text = [\"Q18\"]\n\
             ignore = [\"respondent_id\"]\n",
        )
        .unwrap();
        assert_eq!(cfg.confidence_level, Some(0.9));
        assert_eq!(cfg.digits, Some(1));
        assert_eq!(cfg.continuity_correction, Some(true));
        assert_eq!(cfg.multi_select, strings(&["Q14"]));
        assert_eq!(cfg.multi_select_delimiter, Some('|'));
        assert_eq!(cfg.free_text, strings(&["Q18"]));
        assert_eq!(cfg.ignore, strings(&["respondent_id"]));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(parse("confidence = 0.9\n").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, WilsonciConfig::default());
    }

    #[test]
    fn test_bad_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "digits = \"two\"\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"), "{err}");
    }

    #[test]
    fn test_create_default_config_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        create_default_config(&path).unwrap();
        assert_eq!(load_config(&path).unwrap(), WilsonciConfig::default());
        assert!(matches!(create_default_config(&path), Err(ConfigError::AlreadyExists(_))));
    }

    #[test]
    fn test_column_roles_merge_config_and_cli() {
        let cfg = WilsonciConfig {
            multi_select: strings(&["Q13"]),
            ignore: strings(&["id"]),
            multi_select_delimiter: Some('|'),
            ..Default::default()
        };

        let roles = cfg.column_roles(&strings(&["Q14"]), &strings(&["Q18"]), &[], None);
        assert_eq!(roles.multi_select, strings(&["Q13", "Q14"]));
        assert_eq!(roles.free_text, strings(&["Q18"]));
        assert_eq!(roles.ignore, strings(&["id"]));
        assert_eq!(roles.delimiter, '|');

        let roles = cfg.column_roles(&[], &[], &[], Some(','));
        assert_eq!(roles.delimiter, ',');

        let roles = WilsonciConfig::default().column_roles(&[], &[], &[], None);
        assert_eq!(roles.delimiter, DEFAULT_MULTI_SELECT_DELIMITER);
    }

    #[test]
    fn test_column_roles_to_schema() {
        let roles = ColumnRoles {
            multi_select: strings(&["Q14", "Q18"]),
            free_text: strings(&["Q18"]),
            ignore: strings(&["id"]),
            delimiter: '|',
        };
        let schema = roles.to_schema();
        assert_eq!(schema.kind_of("Q14"), QuestionKind::MultiSelect { delimiter: '|' });
        assert_eq!(schema.kind_of("Q18"), QuestionKind::FreeText);
        assert_eq!(schema.kind_of("id"), QuestionKind::Ignored);
        assert_eq!(schema.kind_of("Q6"), QuestionKind::Categorical);
    }

    #[test]
    fn test_missing_columns_are_reported() {
        let roles = WilsonciConfig::default().column_roles(&strings(&["Q14"]), &[], &strings(&["id"]), None);
        assert_eq!(roles.missing_from(&strings(&["id", "Q6"])), vec!["Q14"]);
    }
}
