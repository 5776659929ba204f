//! Generator configuration: TOML file plus command line overrides

use clap::{Args, ValueEnum};
use pydtogen_schema::{BaseModelRef, ExclusionOverlap, GeneratorOptions, LengthConstraintPriority};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "pydtogen.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Load generator options from `path`, or from `pydtogen.toml` in the
/// working directory if it exists, or fall back to the defaults.
pub fn load_options(path: Option<&Path>) -> Result<GeneratorOptions, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                log::debug!("No {} found, using default options", DEFAULT_CONFIG_FILE);
                return Ok(GeneratorOptions::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let options = parse_options(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(options)
}

pub fn parse_options(content: &str) -> Result<GeneratorOptions, toml::de::Error> {
    toml::from_str(content)
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    StrictWins,
    LengthWins,
    Combine,
}

impl From<PriorityArg> for LengthConstraintPriority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::StrictWins => LengthConstraintPriority::StrictWins,
            PriorityArg::LengthWins => LengthConstraintPriority::LengthWins,
            PriorityArg::Combine => LengthConstraintPriority::Combine,
        }
    }
}

/// Command line flags that take precedence over the configuration file
#[derive(Debug, Clone, Default, Args)]
pub struct OptionOverrides {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Split every table into Base/Create/Update/Read models
    #[arg(long)]
    pub split: bool,

    /// Use Pydantic strict types for primitives
    #[arg(long)]
    pub strict_types: bool,

    /// Do not bound strings and bytes by column length
    #[arg(long)]
    pub no_str_length: bool,

    /// Do not bound integers by bit width
    #[arg(long)]
    pub no_int_length: bool,

    /// What wins when strict types and length bounds both apply
    #[arg(long, value_enum)]
    pub priority: Option<PriorityArg>,

    /// Only warn about fields listed in several exclusion sets
    #[arg(long)]
    pub allow_overlap: bool,

    /// Base class of generated models (e.g. pydantic.BaseModel)
    #[arg(short, long)]
    pub base_model: Option<String>,

    /// System fields exposed by the Read model only (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub restrict: Option<Vec<String>>,

    /// Fields only accepted on create (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub create_only: Option<Vec<String>>,

    /// Fields only returned on read (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub read_only: Option<Vec<String>>,
}

impl OptionOverrides {
    /// Load the configuration file and apply the flags on top
    pub fn resolve(&self) -> Result<GeneratorOptions, ConfigError> {
        let mut options = load_options(self.config.as_deref())?;
        self.apply(&mut options);
        Ok(options)
    }

    pub fn apply(&self, options: &mut GeneratorOptions) {
        if self.split {
            options.split_models = true;
        }
        if self.strict_types {
            options.strict_types = true;
        }
        if self.no_str_length {
            options.constraint_str_length = false;
        }
        if self.no_int_length {
            options.constraint_int_length = false;
        }
        if let Some(priority) = self.priority {
            options.length_constraint_priority = priority.into();
        }
        if self.allow_overlap {
            options.exclusion_overlap = ExclusionOverlap::Warn;
        }
        if let Some(base_model) = &self.base_model {
            options.base_model = BaseModelRef::from(base_model.as_str());
        }
        if let Some(restrict) = &self.restrict {
            options.restrict_fields = clean_fields(restrict).collect();
        }
        if let Some(create_only) = &self.create_only {
            options.create_only_fields.extend(clean_fields(create_only));
        }
        if let Some(read_only) = &self.read_only {
            options.read_only_fields.extend(clean_fields(read_only));
        }
    }
}

fn clean_fields(fields: &[String]) -> impl Iterator<Item = String> + '_ {
    fields
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_parse_partial_config() {
        let options = parse_options(
            r#"
split_models = true
base_model = "app.schemas.Schema"
restrict_fields = ["id"]
length_constraint_priority = "length-wins"
exclusion_overlap = "warn"
"#,
        )
        .unwrap();

        assert!(options.split_models);
        assert_eq!(options.base_model, BaseModelRef::new("app.schemas", "Schema"));
        assert_eq!(options.restrict_fields, BTreeSet::from(["id".to_string()]));
        assert_eq!(options.length_constraint_priority, LengthConstraintPriority::LengthWins);
        assert_eq!(options.exclusion_overlap, ExclusionOverlap::Warn);
        assert_eq!(options.indentation, "    ");
    }

    #[test]
    fn test_invalid_config_value() {
        assert!(parse_options("length_constraint_priority = \"sometimes\"").is_err());
    }

    #[test]
    fn test_overrides_apply_on_top() {
        let mut options = GeneratorOptions {
            create_only_fields: BTreeSet::from(["topic_name".to_string()]),
            ..Default::default()
        };
        let overrides = OptionOverrides {
            split: true,
            no_str_length: true,
            priority: Some(PriorityArg::Combine),
            restrict: Some(vec!["id".to_string(), " ".to_string()]),
            create_only: Some(vec!["secret".to_string()]),
            ..Default::default()
        };
        overrides.apply(&mut options);

        assert!(options.split_models);
        assert!(!options.constraint_str_length);
        assert!(options.constraint_int_length);
        assert_eq!(options.length_constraint_priority, LengthConstraintPriority::Combine);
        assert_eq!(options.restrict_fields, BTreeSet::from(["id".to_string()]));
        assert_eq!(options.create_only_fields.len(), 2);
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_options(Some(Path::new("/nonexistent/pydtogen.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
