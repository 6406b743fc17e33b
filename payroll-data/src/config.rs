//! Loader configuration: named field-mapping profiles read from TOML.
//!
//! ```toml
//! default_profile = "hr_export"
//!
//! [mappings.hr_export]
//! name = ["employee_name"]
//! taxpayer_id = ["document", "cpf"]
//! gross_salary = ["gross"]
//! social_security_discount = ["inss"]
//! dependents = ["dependents"]
//! ```
//!
//! The `canonical` and `localized` profiles are always available. A profile
//! of the same name in the file replaces the built-in one.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use payroll_core::{FieldMapping, InputField, MappingError};
use serde::Deserialize;
use thiserror::Error;

pub const CANONICAL_PROFILE: &str = "canonical";
pub const LOCALIZED_PROFILE: &str = "localized";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("mapping profile '{profile}' is invalid: {source}")]
    Mapping {
        profile: String,
        #[source]
        source: MappingError,
    },

    #[error("unknown mapping profile '{name}'; available: {available:?}")]
    UnknownProfile {
        name: String,
        available: Vec<String>,
    },
}

/// External names accepted for each internal field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingProfile {
    pub name: Vec<String>,
    pub taxpayer_id: Vec<String>,
    pub gross_salary: Vec<String>,
    pub social_security_discount: Vec<String>,
    pub dependents: Vec<String>,
}

impl MappingProfile {
    pub fn to_mapping(&self) -> Result<FieldMapping, MappingError> {
        let pairs = [
            (&self.name, InputField::Name),
            (&self.taxpayer_id, InputField::TaxpayerId),
            (&self.gross_salary, InputField::GrossSalary),
            (&self.social_security_discount, InputField::SocialSecurityDiscount),
            (&self.dependents, InputField::Dependents),
        ];

        FieldMapping::from_pairs(
            pairs
                .into_iter()
                .flat_map(|(names, field)| names.iter().map(move |name| (name.as_str(), field))),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Profile used when none is requested explicitly. Falls back to
    /// [`CANONICAL_PROFILE`].
    #[serde(default)]
    pub default_profile: Option<String>,

    #[serde(default)]
    pub mappings: BTreeMap<String, MappingProfile>,
}

impl LoaderConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Built-in and configured profile names, sorted and deduplicated.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = [CANONICAL_PROFILE, LOCALIZED_PROFILE]
            .into_iter()
            .map(str::to_string)
            .chain(self.mappings.keys().cloned())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Resolve `requested` (or the default profile) into a field mapping.
    pub fn mapping(
        &self,
        requested: Option<&str>,
    ) -> Result<FieldMapping, ConfigError> {
        let name = requested
            .or(self.default_profile.as_deref())
            .unwrap_or(CANONICAL_PROFILE);

        if let Some(profile) = self.mappings.get(name) {
            return profile.to_mapping().map_err(|source| ConfigError::Mapping {
                profile: name.to_string(),
                source,
            });
        }

        match name {
            CANONICAL_PROFILE => Ok(FieldMapping::canonical()),
            LOCALIZED_PROFILE => Ok(FieldMapping::localized()),
            _ => Err(ConfigError::UnknownProfile {
                name: name.to_string(),
                available: self.profile_names(),
            }),
        }
    }
}
