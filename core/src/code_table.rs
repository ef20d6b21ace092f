//! Character → Cangjie code table.
//!
//! The table maps each character (a single Unicode code point) to an ordered
//! list of lower-case Cangjie codes. The first code is the primary code, any
//! further entries are alternates in source-file order. Keys are never stored
//! with an empty code list.
//!
//! Three source formats are supported:
//! - tab-delimited text dictionary (`character<TAB>code[<TAB>tag]`), the
//!   upstream Cangjie5 distribution format;
//! - legacy JSON (`{ "字": ["code", ...] }`, bare-string values accepted);
//! - a compiled bincode artifact produced by [`CodeTable::save_bincode`].

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Failure to load a code or variant table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("read table: {0}")]
    Read(#[from] std::io::Error),
    #[error("parse json table: {0}")]
    Json(#[from] serde_json::Error),
    #[error("decode table artifact: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("unsupported table format: {0}")]
    UnsupportedFormat(String),
    #[error("table {path} contains no entries")]
    Empty { path: String },
}

impl TableError {
    pub(crate) fn open(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Line-level statistics from loading a text dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Total lines read, including skipped ones.
    pub lines: usize,
    /// Blank, comment and malformed lines skipped.
    pub skipped: usize,
}

/// Legacy JSON value shape: the older dictionary stored a bare code string,
/// the newer one a list of alternates. Both are read as a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum CodeValue {
    One(String),
    Many(Vec<String>),
}

impl CodeValue {
    fn into_codes(self) -> Vec<String> {
        match self {
            CodeValue::One(code) => vec![code],
            CodeValue::Many(codes) => codes,
        }
    }
}

/// Immutable character → codes mapping. Built once at startup, then only
/// queried; [`CodeTable::lookup`] is the raw resolver with no normalization
/// or variant substitution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeTable {
    map: AHashMap<char, Vec<String>>,
    #[serde(default)]
    stats: LoadStats,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a code for a character. Codes are canonicalized to lower-case;
    /// empty codes are rejected so a stored key always has at least one code.
    pub fn insert(&mut self, ch: char, code: &str) {
        let code = code.trim().to_ascii_lowercase();
        if code.is_empty() {
            return;
        }
        self.map.entry(ch).or_default().push(code);
    }

    /// Raw table lookup: the stored code list verbatim, or `None` when the
    /// character has no entry. The returned slice is non-empty by
    /// construction.
    pub fn lookup(&self, ch: char) -> Option<&[String]> {
        self.map.get(&ch).map(|codes| codes.as_slice())
    }

    pub fn contains(&self, ch: char) -> bool {
        self.map.contains_key(&ch)
    }

    /// Iterate over all mapped characters.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.map.keys().copied()
    }

    /// Number of mapped characters.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Statistics from the text-dictionary load, if that loader was used.
    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Load from the tab-delimited text dictionary format.
    ///
    /// Blank lines and `#` comments are skipped; so are lines with fewer
    /// than two fields, a multi-character key or an empty code. A character
    /// repeating across lines gains an alternate code per occurrence, in
    /// file order. Malformed lines never abort the load.
    pub fn from_tsv_reader<R: BufRead>(reader: R) -> Result<Self, TableError> {
        let mut table = Self::new();
        let mut stats = LoadStats::default();

        for line in reader.lines() {
            let line = line?;
            stats.lines += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                stats.skipped += 1;
                continue;
            }

            let mut fields = line.split('\t');
            let (Some(key), Some(code)) = (fields.next(), fields.next()) else {
                stats.skipped += 1;
                continue;
            };

            let key = key.trim();
            let mut key_chars = key.chars();
            let (Some(ch), None) = (key_chars.next(), key_chars.next()) else {
                stats.skipped += 1;
                continue;
            };

            let code = code.trim();
            if code.is_empty() {
                stats.skipped += 1;
                continue;
            }
            table.insert(ch, code);
        }

        table.stats = stats;
        info!(
            characters = table.len(),
            lines = stats.lines,
            skipped = stats.skipped,
            "loaded code table from text dictionary"
        );
        Ok(table)
    }

    /// Load from the legacy JSON dictionary (`char → codes`). Bare-string
    /// values are widened to one-element lists; multi-character keys and
    /// entries with no usable code are dropped.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let raw: AHashMap<String, CodeValue> = serde_json::from_reader(reader)?;
        let mut table = Self::new();
        let mut dropped = 0usize;

        for (key, value) in raw {
            let mut key_chars = key.chars();
            let (Some(ch), None) = (key_chars.next(), key_chars.next()) else {
                dropped += 1;
                continue;
            };
            for code in value.into_codes() {
                table.insert(ch, &code);
            }
            if !table.contains(ch) {
                // every code for this entry was empty
                dropped += 1;
            }
        }

        table.stats = LoadStats::default();
        info!(
            characters = table.len(),
            dropped, "loaded code table from json dictionary"
        );
        Ok(table)
    }

    /// Load from a file, dispatching on extension: `.txt`/`.table` as the
    /// text dictionary, `.json` as legacy JSON, `.bin`/`.bincode` as a
    /// compiled artifact.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        let table = match ext {
            "txt" | "table" => {
                let file = File::open(path).map_err(|e| TableError::open(path, e))?;
                Self::from_tsv_reader(BufReader::new(file))?
            }
            "json" => {
                let file = File::open(path).map_err(|e| TableError::open(path, e))?;
                Self::from_json_reader(BufReader::new(file))?
            }
            "bin" | "bincode" => Self::load_bincode(path)?,
            other => return Err(TableError::UnsupportedFormat(other.to_string())),
        };
        if table.is_empty() {
            return Err(TableError::Empty {
                path: path.display().to_string(),
            });
        }
        Ok(table)
    }

    /// Save the table as a compiled bincode artifact.
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| TableError::open(path, e))?;
        let writer = BufWriter::new(file);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    /// Load a table produced by [`CodeTable::save_bincode`].
    pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TableError::open(path, e))?;
        let reader = BufReader::new(file);
        let table: Self = bincode::deserialize_from(reader)?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut table = CodeTable::new();
        table.insert('你', "onf");
        assert_eq!(table.lookup('你'), Some(&["onf".to_string()][..]));
        assert_eq!(table.lookup('好'), None);
    }

    #[test]
    fn codes_are_lowercased() {
        let mut table = CodeTable::new();
        table.insert('你', "ONF");
        assert_eq!(table.lookup('你').unwrap()[0], "onf");
    }

    #[test]
    fn empty_code_is_never_stored() {
        let mut table = CodeTable::new();
        table.insert('你', "  ");
        assert!(!table.contains('你'));
        assert!(table.is_empty());
    }

    #[test]
    fn repeated_character_appends_alternates_in_order() {
        let mut table = CodeTable::new();
        table.insert('於', "ysy");
        table.insert('於', "yso");
        assert_eq!(
            table.lookup('於'),
            Some(&["ysy".to_string(), "yso".to_string()][..])
        );
    }

    #[test]
    fn tsv_loader_skips_blank_comment_and_malformed_lines() {
        let src = "# Cangjie5 test data\n\n你\tonf\n好\tvnd\tcommon\nmalformed-no-tab\n你好\tonf\n界\t\n";
        let table = CodeTable::from_tsv_reader(src.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.contains('你'));
        assert!(table.contains('好'));
        // comment, blank, no-tab, multi-char key, empty code
        assert_eq!(table.stats().skipped, 5);
        assert_eq!(table.stats().lines, 7);
    }

    #[test]
    fn json_loader_accepts_arrays_and_bare_strings() {
        let src = r#"{ "你": ["onf"], "於": ["ysy", "yso"], "好": "vnd" }"#;
        let table = CodeTable::from_json_reader(src.as_bytes()).unwrap();
        assert_eq!(table.lookup('好'), Some(&["vnd".to_string()][..]));
        assert_eq!(table.lookup('於').unwrap().len(), 2);
    }

    #[test]
    fn bincode_roundtrip() {
        let tmp = std::env::temp_dir().join("libcangjie_code_table_test.bin");
        let mut table = CodeTable::new();
        table.insert('你', "onf");
        table.insert('好', "vnd");
        table.save_bincode(&tmp).unwrap();
        let loaded = CodeTable::load_bincode(&tmp).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.lookup('你'), Some(&["onf".to_string()][..]));
        let _ = std::fs::remove_file(tmp);
    }
}
