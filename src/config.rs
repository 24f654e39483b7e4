//! Deployment configuration loaded from TOML.
//!
//! ```toml
//! [program]
//! id = "3FFzaQvjTsFJe9G4xPrFJEmFKbfm21R57C5jVX74YbWS"
//! store = "..."
//! revision = "catalog"
//!
//! [layouts]
//! purchase = "v2"
//!
//! [opcodes]
//! close_account = 6
//!
//! [logging]
//! level = "info"
//! format = "text"
//! output = "stderr"
//! ```

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::Address;
use crate::codec::{ParseLayoutError, PurchaseLayout, StoreLayout};
use crate::instruction::{OpcodeTable, Operation, ProgramRevision, StoreProgram};

/// Configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Target deployment.
    #[serde(default)]
    pub program: ProgramConfig,
    /// Layout overrides. Unset layouts follow the revision.
    #[serde(default)]
    pub layouts: LayoutsConfig,
    /// Per-operation opcode overrides.
    #[serde(default)]
    pub opcodes: OpcodeOverrides,
    /// Logging settings for the CLI.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store program deployment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramConfig {
    /// Base58 program id.
    pub id: Option<String>,
    /// Base58 address of the store account.
    pub store: Option<String>,
    /// `single` or `catalog` (default).
    pub revision: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutsConfig {
    pub store: Option<String>,
    pub purchase: Option<String>,
}

/// Opcodes replacing the revision's defaults, one per operation.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpcodeOverrides {
    pub initialize: Option<u8>,
    pub add_product: Option<u8>,
    pub update_price: Option<u8>,
    pub sell: Option<u8>,
    pub sell_product: Option<u8>,
    pub close_account: Option<u8>,
    pub close_product_account: Option<u8>,
}

impl OpcodeOverrides {
    pub fn apply(&self, base: OpcodeTable) -> OpcodeTable {
        OpcodeTable {
            initialize: self.initialize.unwrap_or(base.initialize),
            add_product: self.add_product.unwrap_or(base.add_product),
            update_price: self.update_price.unwrap_or(base.update_price),
            sell: self.sell.unwrap_or(base.sell),
            sell_product: self.sell_product.unwrap_or(base.sell_product),
            close_account: self.close_account.unwrap_or(base.close_account),
            close_product_account: self
                .close_product_account
                .unwrap_or(base.close_product_account),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `cidacake=debug`.
    pub level: String,
    pub format: LogFormat,
    /// `stdout`, `stderr`, or a file path to append to.
    pub output: String,
    pub timestamps: bool,
    /// Colored output when writing to a terminal.
    pub color: bool,
    /// Include the event target.
    pub target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            output: "stderr".to_string(),
            timestamps: true,
            color: true,
            target: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    pub fn program_id(&self) -> Result<Address, ConfigError> {
        let id = self
            .program
            .id
            .as_deref()
            .ok_or(ConfigError::Missing("program.id"))?;
        parse_address("program.id", id)
    }

    pub fn store_address(&self) -> Result<Option<Address>, ConfigError> {
        self.program
            .store
            .as_deref()
            .map(|s| parse_address("program.store", s))
            .transpose()
    }

    pub fn revision(&self) -> Result<ProgramRevision, ConfigError> {
        self.program
            .revision
            .as_deref()
            .map(|s| s.parse::<ProgramRevision>().map_err(ConfigError::Layout))
            .transpose()
            .map(Option::unwrap_or_default)
    }

    pub fn store_layout(&self) -> Result<StoreLayout, ConfigError> {
        match self.layouts.store.as_deref() {
            Some(s) => s.parse().map_err(ConfigError::Layout),
            None => Ok(self.revision()?.store_layout()),
        }
    }

    pub fn purchase_layout(&self) -> Result<PurchaseLayout, ConfigError> {
        match self.layouts.purchase.as_deref() {
            Some(s) => s.parse().map_err(ConfigError::Layout),
            None => Ok(self.revision()?.purchase_layout()),
        }
    }

    /// The revision's opcode table with overrides applied.
    ///
    /// Two operations sharing an opcode is an error.
    pub fn opcode_table(&self) -> Result<OpcodeTable, ConfigError> {
        let table = self.opcodes.apply(self.revision()?.opcodes());
        match table.find_duplicate() {
            Some(operation) => Err(ConfigError::DuplicateOpcode {
                operation,
                opcode: table.opcode(operation),
            }),
            None => Ok(table),
        }
    }

    /// The deployment described by this configuration.
    pub fn store_program(&self) -> Result<StoreProgram, ConfigError> {
        Ok(StoreProgram {
            program_id: self.program_id()?,
            revision: self.revision()?,
            opcodes: self.opcode_table()?,
            store_layout: self.store_layout()?,
            purchase_layout: self.purchase_layout()?,
        })
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, ConfigError> {
    Address::from_str(value).map_err(|e| ConfigError::InvalidAddress {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(String, std::io::Error),
    /// TOML parse error.
    Parse(toml::de::Error),
    /// A required setting is absent.
    Missing(&'static str),
    /// A setting is not a base58 address.
    InvalidAddress {
        field: &'static str,
        value: String,
        reason: String,
    },
    /// Unknown layout or revision name.
    Layout(ParseLayoutError),
    /// Two operations resolve to the same opcode.
    DuplicateOpcode { operation: Operation, opcode: u8 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Failed to read config file '{}': {}", path, e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Missing(key) => write!(f, "Missing required setting '{}'", key),
            ConfigError::InvalidAddress {
                field,
                value,
                reason,
            } => write!(f, "Invalid address for '{}' ({}): {}", field, value, reason),
            ConfigError::Layout(e) => write!(f, "{}", e),
            ConfigError::DuplicateOpcode { operation, opcode } => write!(
                f,
                "Opcode {} for '{}' is already used by another operation",
                opcode, operation
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Layout(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PROGRAM: &str = "3FFzaQvjTsFJe9G4xPrFJEmFKbfm21R57C5jVX74YbWS";

    #[test]
    fn test_parse_config() {
        let toml = format!(
            r#"
[program]
id = "{PROGRAM}"
revision = "single"

[layouts]
purchase = "v2"

[logging]
level = "debug"
format = "json"
"#
        );
        let config = Config::from_str(&toml).unwrap();
        assert_eq!(config.program_id().unwrap().to_string(), PROGRAM);
        assert_eq!(config.revision().unwrap(), ProgramRevision::Single);
        assert_eq!(config.store_layout().unwrap(), StoreLayout::Single);
        assert_eq!(config.purchase_layout().unwrap(), PurchaseLayout::V2);
        assert_eq!(config.opcode_table().unwrap().close_account, 5);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.output, "stderr");
        assert_eq!(config.store_address().unwrap(), None);
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.revision().unwrap(), ProgramRevision::Catalog);
        assert_eq!(config.opcode_table().unwrap(), OpcodeTable::CATALOG_STORE);
        assert!(matches!(config.program_id(), Err(ConfigError::Missing("program.id"))));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_opcode_override() {
        let config = Config::from_str("[opcodes]\nclose_account = 5\n").unwrap();
        assert_eq!(config.opcode_table().unwrap().close_account, 5);

        let config = Config::from_str("[opcodes]\nclose_account = 7\n").unwrap();
        let err = config.opcode_table().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateOpcode {
                operation: Operation::CloseAccount,
                opcode: 7
            }
        ));
    }

    #[test]
    fn test_invalid_values() {
        let config = Config::from_str("[program]\nid = \"not base58!\"\n").unwrap();
        assert!(matches!(
            config.program_id(),
            Err(ConfigError::InvalidAddress { field: "program.id", .. })
        ));

        let config = Config::from_str("[layouts]\nstore = \"v9\"\n").unwrap();
        assert!(matches!(config.store_layout(), Err(ConfigError::Layout(_))));

        assert!(matches!(
            Config::from_str("[program]\nunknown = 1\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cidacake.toml");
        std::fs::write(&path, format!("[program]\nid = \"{PROGRAM}\"\n")).unwrap();
        let program = Config::from_file(&path).unwrap().store_program().unwrap();
        assert_eq!(program.purchase_layout, PurchaseLayout::V2);
        assert_eq!(program.revision, ProgramRevision::Catalog);

        let err = Config::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}
