//! Conversion pipeline: text in, per-character Cangjie results out.
//!
//! `Converter` owns shared read-only handles to the frozen tables and turns
//! an input string into a [`ConversionSummary`]. The computation is pure:
//! no I/O, no locking, safe to run from any number of threads.

use crate::code_table::{CodeTable, TableError};
use crate::radicals::{format_code, FormattedCode};
use crate::variant::VariantTable;
use crate::{utils, Config};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Conversion request rejection. Lookup misses are data, not errors; the
/// only failure the pipeline itself produces is invalid input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// Empty or whitespace-only input, rejected before the pipeline runs.
    #[error("text is required: input is empty after trimming")]
    EmptyInput,
}

/// Codes resolved for one character form. `codes` is the table value
/// verbatim; empty means the form has no entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharCodes {
    pub character: char,
    pub codes: Vec<String>,
}

impl CharCodes {
    pub fn found(&self) -> bool {
        !self.codes.is_empty()
    }

    /// The primary code: first in table order. Alternates never replace it.
    pub fn primary(&self) -> Option<&str> {
        self.codes.first().map(String::as_str)
    }

    /// Codes beyond the primary, shown on demand.
    pub fn alternates(&self) -> &[String] {
        self.codes.get(1..).unwrap_or(&[])
    }

    /// Radical renderings for every code, primary first.
    pub fn formatted(&self) -> Vec<FormattedCode> {
        self.codes.iter().map(|c| format_code(c)).collect()
    }
}

/// Simplified/traditional sub-results for a character that participates in
/// a variant pair. Each side is resolved independently; the pair relation
/// does not guarantee the partner has a code entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantMatch {
    pub simplified: CharCodes,
    pub traditional: CharCodes,
}

/// Result for one input character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub character: char,
    pub found: bool,
    pub codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantMatch>,
}

impl ConversionResult {
    pub fn primary(&self) -> Option<&str> {
        self.codes.first().map(String::as_str)
    }
}

/// Ordered per-character results plus aggregate counts. Whitespace input
/// characters are excluded throughout, so
/// `found_count + not_found_count == total_characters` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSummary {
    pub results: Vec<ConversionResult>,
    pub total_characters: usize,
    pub found_count: usize,
    pub not_found_count: usize,
}

/// The conversion engine. Tables are loaded once and shared read-only; a
/// missing variant table degrades to single-character results rather than
/// failing requests.
#[derive(Debug, Clone)]
pub struct Converter {
    code_table: Arc<CodeTable>,
    variants: Option<Arc<VariantTable>>,
}

impl Converter {
    pub fn new(code_table: CodeTable, variants: Option<VariantTable>) -> Self {
        Self {
            code_table: Arc::new(code_table),
            variants: variants.map(Arc::new),
        }
    }

    /// Startup sequence: the code table must load or this fails; the
    /// variant table is optional and its load failure only degrades the
    /// converter for the rest of the process lifetime. No retry.
    pub fn from_config(config: &Config) -> Result<Self, TableError> {
        let code_table = CodeTable::from_path(&config.code_table)?;

        let variants = match &config.variant_table {
            None => None,
            Some(path) => match VariantTable::from_json_path(path) {
                Ok(mut table) => {
                    if config.filter_variants_to_code_table {
                        table.retain_known(&code_table);
                    }
                    Some(table)
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "variant table unavailable, serving single-character results"
                    );
                    None
                }
            },
        };

        Ok(Self::new(code_table, variants))
    }

    pub fn code_table(&self) -> &CodeTable {
        &self.code_table
    }

    /// Whether variant enrichment is active.
    pub fn has_variants(&self) -> bool {
        self.variants.is_some()
    }

    /// Convert a string into per-character Cangjie results.
    ///
    /// Iteration is by Unicode scalar value; whitespace code points are
    /// skipped and never counted. For each resolved character the variant
    /// disambiguator is consulted, and when a pair exists both forms are
    /// looked up independently. Empty input (after trimming) is rejected,
    /// which is distinct from a summary where nothing was found.
    pub fn convert(&self, text: &str) -> Result<ConversionSummary, ConvertError> {
        if utils::normalize(text).is_empty() {
            return Err(ConvertError::EmptyInput);
        }

        let mut results = Vec::new();
        let mut found_count = 0usize;

        for ch in text.chars() {
            if ch.is_whitespace() {
                continue;
            }

            let codes = self
                .code_table
                .lookup(ch)
                .map(|codes| codes.to_vec())
                .unwrap_or_default();
            let found = !codes.is_empty();
            if found {
                found_count += 1;
            }

            let variant = if found {
                self.variants
                    .as_deref()
                    .and_then(|table| table.resolve(ch))
                    .map(|pair| VariantMatch {
                        simplified: self.lookup_codes(pair.simplified),
                        traditional: self.lookup_codes(pair.traditional),
                    })
            } else {
                None
            };

            results.push(ConversionResult {
                character: ch,
                found,
                codes,
                variant,
            });
        }

        let total_characters = results.len();
        Ok(ConversionSummary {
            results,
            total_characters,
            found_count,
            not_found_count: total_characters - found_count,
        })
    }

    fn lookup_codes(&self, ch: char) -> CharCodes {
        CharCodes {
            character: ch,
            codes: self
                .code_table
                .lookup(ch)
                .map(|codes| codes.to_vec())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> Converter {
        let mut codes = CodeTable::new();
        codes.insert('你', "onf");
        codes.insert('好', "vnd");
        codes.insert('买', "nnbo");
        codes.insert('買', "wlbuc");
        let mut variants = VariantTable::new();
        variants.insert_s2t('买', '買');
        variants.insert_t2s('買', '买');
        Converter::new(codes, Some(variants))
    }

    #[test]
    fn counts_always_add_up() {
        let summary = converter().convert("你好嗎").unwrap();
        assert_eq!(summary.total_characters, 3);
        assert_eq!(
            summary.found_count + summary.not_found_count,
            summary.total_characters
        );
        assert_eq!(summary.found_count, 2);
    }

    #[test]
    fn whitespace_is_skipped_everywhere() {
        let summary = converter().convert(" 你\t好 \n").unwrap();
        assert_eq!(summary.total_characters, 2);
        assert!(summary.results.iter().all(|r| !r.character.is_whitespace()));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(converter().convert(""), Err(ConvertError::EmptyInput));
        assert_eq!(converter().convert(" \n\t"), Err(ConvertError::EmptyInput));
    }

    #[test]
    fn variant_carries_both_forms() {
        let summary = converter().convert("买").unwrap();
        let variant = summary.results[0].variant.as_ref().unwrap();
        assert_eq!(variant.simplified.character, '买');
        assert_eq!(variant.simplified.primary(), Some("nnbo"));
        assert_eq!(variant.traditional.character, '買');
        assert_eq!(variant.traditional.primary(), Some("wlbuc"));
    }

    #[test]
    fn variant_partner_may_be_missing_from_code_table() {
        let mut codes = CodeTable::new();
        codes.insert('发', "nohe");
        let mut variants = VariantTable::new();
        variants.insert_s2t('发', '發');
        let converter = Converter::new(codes, Some(variants));

        let summary = converter.convert("发").unwrap();
        let result = &summary.results[0];
        assert!(result.found);
        let variant = result.variant.as_ref().unwrap();
        assert!(variant.simplified.found());
        assert!(!variant.traditional.found());
        assert_eq!(variant.traditional.primary(), None);
    }

    #[test]
    fn no_variant_table_degrades_to_single_character_results() {
        let mut codes = CodeTable::new();
        codes.insert('买', "nnbo");
        let converter = Converter::new(codes, None);
        assert!(!converter.has_variants());
        let summary = converter.convert("买").unwrap();
        assert!(summary.results[0].found);
        assert!(summary.results[0].variant.is_none());
    }

    #[test]
    fn conversion_is_idempotent() {
        let c = converter();
        assert_eq!(c.convert("你好 买").unwrap(), c.convert("你好 买").unwrap());
    }
}
