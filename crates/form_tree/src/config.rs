//! Tree-wide behavior switches.
//!
//! Configuration is plain serde data so hosts can embed it in their own
//! settings files. `from_toml_str` accepts either a bare table or a document
//! carrying a `[form_tree]` section.

use crate::errors::{FormError, Result};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the tree reacts to inputs it cannot represent faithfully.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Degrade silently: mismatched values are stored verbatim, array values
    /// without a field prototype leave the field childless, and elements
    /// attached elsewhere are moved.
    #[default]
    Lenient,
    /// Report those situations as [`FormError`]s and leave the tree untouched.
    Strict,
}

impl Mode {
    pub fn is_strict(self) -> bool {
        matches!(self, Mode::Strict)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub mode: Mode,
    /// Free the children an array assignment replaces. When false they stay in
    /// the arena as detached roots.
    pub dispose_replaced_children: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Lenient,
            dispose_replaced_children: true,
        }
    }
}

impl TreeConfig {
    pub const SECTION: &'static str = "form_tree";

    pub fn strict() -> Self {
        Self {
            mode: Mode::Strict,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut table: toml::Table = text
            .parse()
            .map_err(|e: toml::de::Error| FormError::Config(e.to_string()))?;

        let section = match table.remove(Self::SECTION) {
            Some(toml::Value::Table(section)) => section,
            Some(other) => {
                return Err(FormError::Config(format!(
                    "[{}] must be a table, found {}",
                    Self::SECTION,
                    other.type_str()
                )));
            }
            None => table,
        };

        toml::Value::Table(section)
            .try_into()
            .map_err(|e: toml::de::Error| FormError::Config(e.to_string()))
    }
}
