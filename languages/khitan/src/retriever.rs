use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

use khitan_core::{ContextBlock, Direction, Entry, MatchType, SourceKind, Token, normalize_phonetic};

/// Context lines kept after ranking unless configured otherwise
pub const DEFAULT_MAX_CONTEXT_ENTRIES: usize = 50;

/// Context text when nothing in the glossary matched
pub const NO_MATCH_FALLBACK: &str =
    "(No direct match was found in the local glossary; reason from general linguistic knowledge.)";

pub const GLYPH_STEP_TAG: &str = "step 1: Khitan script (glyph)";
pub const PHONETIC_STEP_TAG: &str = "step 2: Khitan-transliteration characters (phonetic)";

/// One matched entry and what triggered it
#[derive(Debug, Clone)]
pub struct ContextMatch<'a> {
    pub entry: &'a Entry,
    pub token: String,
    pub match_type: MatchType,
}

impl ContextMatch<'_> {
    /// Phonetic exact first, then exact word, then longer words
    fn rank_key(&self) -> (bool, bool, Reverse<usize>) {
        (
            self.match_type != MatchType::PhoneticExact,
            self.match_type != MatchType::ExactWord,
            Reverse(self.entry.word().chars().count()),
        )
    }

    /// One context line for this match
    pub fn format_line(&self) -> String {
        let entry = self.entry;
        match entry.source_kind() {
            SourceKind::Glyph => format!(
                "[{}|{}] glyph[{}] original meaning: {}",
                GLYPH_STEP_TAG,
                self.match_type,
                entry.word(),
                entry.meaning()
            ),
            SourceKind::Phonetic => {
                let pronunciation = if entry.pronunciation().is_empty() {
                    String::new()
                } else {
                    format!("({})", entry.pronunciation())
                };
                format!(
                    "[{}|{}] written form: {}{} -> ancient meaning: {}",
                    PHONETIC_STEP_TAG,
                    self.match_type,
                    entry.word(),
                    pronunciation,
                    entry.meaning()
                )
            }
        }
    }
}

/// Linear-scan matcher over the glossary
#[derive(Debug, Clone, Copy)]
pub struct ContextRetriever {
    max_entries: usize,
}

impl Default for ContextRetriever {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTEXT_ENTRIES)
    }
}

impl ContextRetriever {
    pub fn new(max_entries: usize) -> Self {
        Self { max_entries }
    }

    /// Whitespace tokens; a single multi-character token also contributes
    /// each of its characters, so unspaced script queries match per glyph.
    pub fn tokenize(query: &str) -> Vec<Token> {
        let mut surfaces: Vec<String> = query.split_whitespace().map(str::to_string).collect();

        if let [single] = surfaces.as_slice() {
            if single.chars().count() > 1 {
                let chars: Vec<String> = single.chars().map(String::from).collect();
                surfaces.extend(chars);
            }
        }

        surfaces
            .into_iter()
            .enumerate()
            .map(|(position, surface)| Token { surface, position })
            .collect()
    }

    /// Matched entries in rank order, deduplicated by (word, meaning) and
    /// truncated to the configured maximum
    pub fn find_matches<'a>(&self, entries: &'a [Entry], query: &str) -> Vec<ContextMatch<'a>> {
        self.rank(entries, query).0
    }

    /// Ranked, truncated matches plus the triggering tokens of every match,
    /// including those cut by truncation
    fn rank<'a>(&self, entries: &'a [Entry], query: &str) -> (Vec<ContextMatch<'a>>, BTreeSet<String>) {
        let query = query.trim();
        let query_norm = normalize_phonetic(query);
        let tokens = Self::tokenize(query);

        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut matched_tokens = BTreeSet::new();
        let mut matches = Vec::new();

        for entry in entries {
            let Some((match_type, token)) = match_entry(entry, &tokens, query, &query_norm) else {
                continue;
            };

            if !seen.insert((entry.word(), entry.meaning())) {
                continue;
            }

            if !token.is_empty() {
                matched_tokens.insert(token.clone());
            }
            matches.push(ContextMatch {
                entry,
                token,
                match_type,
            });
        }

        matches.sort_by_key(ContextMatch::rank_key);
        matches.truncate(self.max_entries);
        (matches, matched_tokens)
    }

    /// Ranked, formatted context block for a query. Never fails; an empty
    /// query or no match yields the fallback sentence.
    pub fn retrieve(&self, entries: &[Entry], query: &str, direction: Direction) -> ContextBlock {
        let (matches, matched_tokens) = self.rank(entries, query);
        tracing::debug!(
            "Retrieved {} context entries for '{}' ({})",
            matches.len(),
            query.trim(),
            direction
        );

        if matches.is_empty() {
            return ContextBlock {
                text: NO_MATCH_FALLBACK.to_string(),
                match_count: 0,
                matched_tokens: Vec::new(),
            };
        }

        let lines: Vec<String> = matches.iter().map(ContextMatch::format_line).collect();

        ContextBlock {
            text: lines.join("\n"),
            match_count: lines.len(),
            matched_tokens: matched_tokens.into_iter().collect(),
        }
    }
}

/// Every token is checked and the last one that matches decides; phonetic
/// matching only applies when no token matched.
fn match_entry(entry: &Entry, tokens: &[Token], query: &str, query_norm: &str) -> Option<(MatchType, String)> {
    let word = entry.word();
    let meaning = entry.meaning();
    let mut found = None;

    for token in tokens {
        let surface = token.surface.as_str();
        if surface.trim().is_empty() {
            continue;
        }

        let match_type = if surface == word {
            MatchType::ExactWord
        } else if meaning.contains(surface) {
            MatchType::MeaningContains
        } else if surface.contains(meaning) {
            MatchType::MeaningRelated
        } else {
            continue;
        };

        found = Some((match_type, token.surface.clone()));
    }

    if found.is_some() {
        return found;
    }

    let pronunciation = entry.pronunciation_normalized();
    if entry.source_kind() != SourceKind::Phonetic
        || query_norm.chars().count() <= 1
        || pronunciation.is_empty()
    {
        return None;
    }

    if query_norm == pronunciation {
        Some((MatchType::PhoneticExact, query.to_string()))
    } else if pronunciation.contains(query_norm) {
        Some((MatchType::PhoneticFuzzy, query.to_string()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(word: &str, meaning: &str) -> Entry {
        Entry::glyph(word, meaning).unwrap()
    }

    fn phonetic(word: &str, meaning: &str, pronunciation: &str) -> Entry {
        Entry::phonetic(word, meaning, pronunciation).unwrap()
    }

    fn surfaces(query: &str) -> Vec<String> {
        ContextRetriever::tokenize(query).into_iter().map(|t| t.surface).collect()
    }

    #[test]
    fn single_token_expands_to_characters() {
        assert_eq!(surfaces("阿保机"), vec!["阿保机", "阿", "保", "机"]);
        assert_eq!(surfaces("天"), vec!["天"]);
        assert_eq!(surfaces("契丹 首领"), vec!["契丹", "首领"]);
        assert!(surfaces("   ").is_empty());
    }

    #[test]
    fn token_rules_in_priority_order() {
        let entries = vec![
            glyph("天", "sky"),
            glyph("𘭾", "天空"),
            glyph("𘭿", "天"),
        ];
        let retriever = ContextRetriever::default();

        let matches = retriever.find_matches(&entries, "天");
        let types: Vec<MatchType> = matches.iter().map(|m| m.match_type).collect();

        // Exact word ranks first, the rest keep scan order
        assert_eq!(
            types,
            vec![MatchType::ExactWord, MatchType::MeaningContains, MatchType::MeaningContains]
        );
    }

    #[test]
    fn containment_in_both_directions() {
        let entries = vec![glyph("𘭾", "首领")];
        let matches = ContextRetriever::default().find_matches(&entries, "契丹 首领长");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchType::MeaningRelated);
        assert_eq!(matches[0].token, "首领长");

        // Neither side of the whole token contains the other; the
        // character token "首" does
        let matches = ContextRetriever::default().find_matches(&entries, "首长");
        assert_eq!(matches[0].match_type, MatchType::MeaningContains);
        assert_eq!(matches[0].token, "首");
    }

    #[test]
    fn last_matching_token_decides() {
        // Tokens are 阿保机, 阿, 保, 机; the character 机 is checked last
        let entries = vec![glyph("阿保机", "阿保机之名")];
        let matches = ContextRetriever::default().find_matches(&entries, "阿保机");
        assert_eq!(matches[0].match_type, MatchType::MeaningContains);
        assert_eq!(matches[0].token, "机");

        // A later token that matches nothing leaves the earlier match in place
        let entries = vec![glyph("契丹", "部族名")];
        let matches = ContextRetriever::default().find_matches(&entries, "契丹 天");
        assert_eq!(matches[0].match_type, MatchType::ExactWord);
        assert_eq!(matches[0].token, "契丹");
    }

    #[test]
    fn phonetic_exact_and_fuzzy() {
        let entries = vec![
            phonetic("林牙", "官名", "Línyá"),
            phonetic("林牙里", "官署", "linyali"),
            glyph("𘭾", "linya"),
        ];
        let matches = ContextRetriever::default().find_matches(&entries, "LINYA");

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].entry.word(), "林牙");
        assert_eq!(matches[0].match_type, MatchType::PhoneticExact);
        assert_eq!(matches[0].token, "LINYA");
        assert_eq!(matches[1].match_type, MatchType::PhoneticFuzzy);
    }

    #[test]
    fn single_character_query_skips_phonetic() {
        let entries = vec![phonetic("阿", "姓", "a")];
        assert!(ContextRetriever::default().find_matches(&entries, "a").is_empty());
    }

    #[test]
    fn phonetic_exact_ranks_before_everything() {
        let entries = vec![
            glyph("abaoji", "名"),
            phonetic("阿保机", "契丹首领", "abaoji"),
            glyph("x", "abaoji之义"),
        ];
        let matches = ContextRetriever::default().find_matches(&entries, "abaoji");
        assert_eq!(matches[0].match_type, MatchType::PhoneticExact);
        assert_eq!(matches[1].match_type, MatchType::ExactWord);
        assert_eq!(matches[2].match_type, MatchType::MeaningContains);
    }

    #[test]
    fn longer_words_first_within_tier() {
        let entries = vec![
            glyph("a", "天"),
            glyph("abc", "天"),
            glyph("ab", "天"),
        ];
        let matches = ContextRetriever::default().find_matches(&entries, "天");
        let words: Vec<&str> = matches.iter().map(|m| m.entry.word()).collect();
        assert_eq!(words, vec!["abc", "ab", "a"]);
    }

    #[test]
    fn duplicates_are_dropped() {
        let entries = vec![
            glyph("𘭾", "天"),
            glyph("𘭾", "天"),
            phonetic("𘭾", "天", "tian"),
        ];
        let block = ContextRetriever::default().retrieve(&entries, "𘭾", Direction::ScriptToModern);
        assert_eq!(block.match_count, 1);
    }

    #[test]
    fn results_are_truncated() {
        let entries: Vec<Entry> = (0..80).map(|i| glyph(&format!("w{i}"), "天")).collect();
        let block = ContextRetriever::new(50).retrieve(&entries, "天", Direction::ModernToScript);
        assert_eq!(block.match_count, 50);
        assert_eq!(block.lines().count(), 50);
    }

    #[test]
    fn empty_query_returns_fallback() {
        let entries = vec![glyph("𘭾", "天"), phonetic("林牙", "官名", "linya")];
        let block = ContextRetriever::default().retrieve(&entries, "   ", Direction::ScriptToModern);
        assert_eq!(block.text, NO_MATCH_FALLBACK);
        assert_eq!(block.match_count, 0);
        assert!(block.matched_tokens.is_empty());
    }

    #[test]
    fn phonetic_line_without_pronunciation() {
        let entry = phonetic("夷离堇", "部落军事首领", "");
        let line = ContextMatch {
            entry: &entry,
            token: "夷离堇".to_string(),
            match_type: MatchType::ExactWord,
        }
        .format_line();
        assert_eq!(
            line,
            "[step 2: Khitan-transliteration characters (phonetic)|exact word] written form: 夷离堇 -> ancient meaning: 部落军事首领"
        );
    }

    #[test]
    fn matched_tokens_include_truncated_matches() {
        let mut entries: Vec<Entry> = (0..50).map(|i| glyph(&format!("w{i}"), "天")).collect();
        entries.push(glyph("z", "地"));

        let block = ContextRetriever::new(50).retrieve(&entries, "天 地", Direction::ScriptToModern);
        assert_eq!(block.match_count, 50);
        assert!(!block.text.contains("glyph[z]"));
        assert_eq!(block.matched_tokens, vec!["地", "天"]);
    }

    #[test]
    fn matched_tokens_are_unique_and_sorted() {
        let entries = vec![glyph("x", "天地"), glyph("y", "天"), glyph("z", "地")];
        let block = ContextRetriever::default().retrieve(&entries, "地 天", Direction::ModernToScript);
        assert_eq!(block.matched_tokens, vec!["地", "天"]);
    }
}
