//! Cangjie radical glyphs and code formatting.
//!
//! Every Cangjie input letter corresponds to one canonical radical glyph
//! (e.g. `a` → 日, `q` → 手). The table below covers the 24 ordinary letters
//! plus the two wildcard letters kept by the reference keyboard layout
//! (`z` 我, `x` 難). It is a fixed constant for the process lifetime.

use phf::phf_map;
use serde::{Deserialize, Serialize};

/// QWERTY letter → radical glyph. Keys are lower-case.
pub static CANGJIE_RADICALS: phf::Map<char, char> = phf_map! {
    'q' => '手', 'w' => '田', 'e' => '水', 'r' => '口', 't' => '廿',
    'y' => '卜', 'u' => '山', 'i' => '戈', 'o' => '人', 'p' => '心',
    'a' => '日', 's' => '尸', 'd' => '木', 'f' => '火', 'g' => '土',
    'h' => '竹', 'j' => '十', 'k' => '大', 'l' => '中', 'z' => '我',
    'x' => '難', 'c' => '金', 'v' => '女', 'b' => '月', 'n' => '弓',
    'm' => '一',
};

/// Look up the radical glyph for a single input letter.
///
/// Case-insensitive; the table itself is keyed lower-case.
pub fn radical_for(letter: char) -> Option<char> {
    CANGJIE_RADICALS.get(&letter.to_ascii_lowercase()).copied()
}

/// A Cangjie code rendered for display: the radical glyphs alongside the
/// original keystroke sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedCode {
    pub radicals: String,
    pub qwerty: String,
}

/// Convert a raw QWERTY Cangjie code into its radical rendering.
///
/// Letters with no radical assignment pass through unchanged, so formatting
/// never fails on unexpected input data. `qwerty` carries the input verbatim.
pub fn format_code(code: &str) -> FormattedCode {
    let radicals = code
        .chars()
        .map(|c| radical_for(c).unwrap_or(c))
        .collect::<String>();
    FormattedCode {
        radicals,
        qwerty: code.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radical_lookup_covers_all_letters() {
        assert_eq!(radical_for('a'), Some('日'));
        assert_eq!(radical_for('q'), Some('手'));
        assert_eq!(radical_for('m'), Some('一'));
        assert_eq!(CANGJIE_RADICALS.len(), 26);
    }

    #[test]
    fn radical_lookup_is_case_insensitive() {
        assert_eq!(radical_for('A'), radical_for('a'));
        assert_eq!(radical_for('Z'), Some('我'));
    }

    #[test]
    fn format_substitutes_each_letter() {
        let f = format_code("onf");
        assert_eq!(f.radicals, "人弓火");
        assert_eq!(f.qwerty, "onf");
    }

    #[test]
    fn format_passes_unknown_letters_through() {
        let f = format_code("a1-");
        assert_eq!(f.radicals, "日1-");
        assert_eq!(f.qwerty, "a1-");
    }

    #[test]
    fn format_is_deterministic() {
        assert_eq!(format_code("hqi"), format_code("hqi"));
    }
}
