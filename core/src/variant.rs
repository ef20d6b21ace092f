//! Simplified/Traditional variant table and disambiguation.
//!
//! Two directional maps are kept, simplified→traditional (`s2t`) and
//! traditional→simplified (`t2s`). They come from independently maintained
//! source dictionaries and are not guaranteed mutually consistent: a
//! character may appear in one direction only, or in both pointing at
//! different partners. Construction policy: first mapping wins, conflicts
//! are recorded on the table rather than silently dropped, and self-mappings
//! are excluded. Nothing is reconciled at lookup time; the `check_variants`
//! tool reports inconsistencies offline.

use crate::code_table::{CodeTable, TableError};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{info, warn};

/// A simplified/traditional character pair, normalized so `simplified` and
/// `traditional` always carry the respective script form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantPair {
    pub simplified: char,
    pub traditional: char,
}

/// Which directional map a conflict was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    SimplifiedToTraditional,
    TraditionalToSimplified,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::SimplifiedToTraditional => write!(f, "s2t"),
            Direction::TraditionalToSimplified => write!(f, "t2s"),
        }
    }
}

/// A rejected insertion: `from` already mapped to `kept` when a mapping to
/// `rejected` arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantConflict {
    pub direction: Direction,
    pub from: char,
    pub kept: char,
    pub rejected: char,
}

/// Raw JSON shape of the precomputed variant file.
#[derive(Deserialize)]
struct RawVariantFile {
    #[serde(default)]
    s2t: AHashMap<String, String>,
    #[serde(default)]
    t2s: AHashMap<String, String>,
}

/// The frozen variant table. Built once, then only queried.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantTable {
    s2t: AHashMap<char, char>,
    t2s: AHashMap<char, char>,
    conflicts: Vec<VariantConflict>,
}

impl VariantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a simplified→traditional mapping. Self-mappings are excluded;
    /// an existing different mapping for the same key is kept and the new
    /// one recorded as a conflict. Returns whether the mapping was stored.
    pub fn insert_s2t(&mut self, simplified: char, traditional: char) -> bool {
        Self::insert_directional(
            &mut self.s2t,
            &mut self.conflicts,
            Direction::SimplifiedToTraditional,
            simplified,
            traditional,
        )
    }

    /// Insert a traditional→simplified mapping, same policy as
    /// [`VariantTable::insert_s2t`].
    pub fn insert_t2s(&mut self, traditional: char, simplified: char) -> bool {
        Self::insert_directional(
            &mut self.t2s,
            &mut self.conflicts,
            Direction::TraditionalToSimplified,
            traditional,
            simplified,
        )
    }

    fn insert_directional(
        map: &mut AHashMap<char, char>,
        conflicts: &mut Vec<VariantConflict>,
        direction: Direction,
        from: char,
        to: char,
    ) -> bool {
        if from == to {
            return false;
        }
        match map.get(&from) {
            None => {
                map.insert(from, to);
                true
            }
            Some(&kept) if kept == to => false,
            Some(&kept) => {
                conflicts.push(VariantConflict {
                    direction,
                    from,
                    kept,
                    rejected: to,
                });
                false
            }
        }
    }

    /// Resolve a character to its variant pair, if it participates in one.
    ///
    /// The forward (simplified→traditional) direction has priority: when a
    /// character appears in both maps, the pair is taken from `s2t`. This is
    /// the deterministic tie-break; inconsistent directional data is never
    /// repaired here.
    pub fn resolve(&self, ch: char) -> Option<VariantPair> {
        if let Some(&traditional) = self.s2t.get(&ch) {
            return Some(VariantPair {
                simplified: ch,
                traditional,
            });
        }
        if let Some(&simplified) = self.t2s.get(&ch) {
            return Some(VariantPair {
                simplified,
                traditional: ch,
            });
        }
        None
    }

    /// The traditional form mapped from a simplified character, if any.
    pub fn traditional_for(&self, simplified: char) -> Option<char> {
        self.s2t.get(&simplified).copied()
    }

    /// The simplified form mapped from a traditional character, if any.
    pub fn simplified_for(&self, traditional: char) -> Option<char> {
        self.t2s.get(&traditional).copied()
    }

    /// Conflicts recorded during construction, in insertion order.
    pub fn conflicts(&self) -> &[VariantConflict] {
        &self.conflicts
    }

    pub fn s2t_len(&self) -> usize {
        self.s2t.len()
    }

    pub fn t2s_len(&self) -> usize {
        self.t2s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.s2t.is_empty() && self.t2s.is_empty()
    }

    /// Iterate the simplified→traditional mappings.
    pub fn s2t_entries(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.s2t.iter().map(|(&k, &v)| (k, v))
    }

    /// Iterate the traditional→simplified mappings.
    pub fn t2s_entries(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.t2s.iter().map(|(&k, &v)| (k, v))
    }

    /// Drop mappings whose endpoints are not both present in the code
    /// table, so the pipeline never surfaces a variant it cannot resolve
    /// against at least one direction of the pair. Returns the number of
    /// mappings removed.
    pub fn retain_known(&mut self, codes: &CodeTable) -> usize {
        let before = self.s2t.len() + self.t2s.len();
        self.s2t
            .retain(|&from, &mut to| codes.contains(from) && codes.contains(to));
        self.t2s
            .retain(|&from, &mut to| codes.contains(from) && codes.contains(to));
        let removed = before - (self.s2t.len() + self.t2s.len());
        if removed > 0 {
            info!(removed, "filtered variant mappings outside the code table");
        }
        removed
    }

    /// Load from the precomputed JSON file (`{ "s2t": {..}, "t2s": {..} }`).
    /// Multi-character keys or values are dropped with a warning; the
    /// first-wins/self-exclusion policy applies per mapping.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let raw: RawVariantFile = serde_json::from_reader(reader)?;
        let mut table = Self::new();
        let mut dropped = 0usize;

        for (from, to) in &raw.s2t {
            match (single_char(from), single_char(to)) {
                (Some(f), Some(t)) => {
                    table.insert_s2t(f, t);
                }
                _ => dropped += 1,
            }
        }
        for (from, to) in &raw.t2s {
            match (single_char(from), single_char(to)) {
                (Some(f), Some(t)) => {
                    table.insert_t2s(f, t);
                }
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!(dropped, "dropped variant mappings with multi-char entries");
        }
        info!(
            s2t = table.s2t_len(),
            t2s = table.t2s_len(),
            conflicts = table.conflicts.len(),
            "loaded variant table"
        );
        Ok(table)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TableError::open(path, e))?;
        Self::from_json_reader(BufReader::new(file))
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
