//! libcangjie-core
//!
//! Character-resolution and variant-disambiguation engine for converting
//! Chinese-character text into Cangjie input-method codes. The engine is a
//! pure function over two frozen lookup tables; transport and rendering
//! live in external collaborators that consume [`ConversionSummary`].
//!
//! Public API:
//! - `CodeTable` - character → ordered Cangjie codes, with the raw resolver
//! - `VariantTable` - simplified/traditional directional maps + tie-break
//! - `format_code` - QWERTY code → radical-glyph rendering
//! - `Converter` - the conversion pipeline (`convert(text)`)
//! - `Config` - data-file locations and startup options

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod code_table;
pub use code_table::{CodeTable, LoadStats, TableError};

pub mod variant;
pub use variant::{Direction, VariantConflict, VariantPair, VariantTable};

pub mod radicals;
pub use radicals::{format_code, radical_for, FormattedCode, CANGJIE_RADICALS};

pub mod convert;
pub use convert::{
    CharCodes, ConversionResult, ConversionSummary, ConvertError, Converter, VariantMatch,
};

/// Startup configuration: where the tables live and how to treat the
/// variant data. Loaded once; the tables built from it are frozen for the
/// process lifetime.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Cangjie code dictionary. Format is chosen by extension:
    /// `.txt`/`.table` (tab-delimited), `.json` (legacy), `.bin` (compiled).
    pub code_table: PathBuf,

    /// Precomputed simplified/traditional table (`{ "s2t", "t2s" }` JSON).
    /// When unset or unloadable the converter serves single-character
    /// results only.
    pub variant_table: Option<PathBuf>,

    /// Drop variant mappings whose endpoints are missing from the code
    /// table, matching the offline table-build filter.
    pub filter_variants_to_code_table: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            code_table: PathBuf::from("data/cangjie5.txt"),
            variant_table: Some(PathBuf::from("data/simplified-traditional.json")),
            filter_variants_to_code_table: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_toml_roundtrip() {
        let config = Config::default();
        let text = config.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&text).unwrap();
        assert_eq!(parsed.code_table, config.code_table);
        assert_eq!(parsed.variant_table, config.variant_table);
        assert!(parsed.filter_variants_to_code_table);
    }

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(utils::normalize("  你好\n"), "你好");
        assert_eq!(utils::normalize(" \t "), "");
    }
}
