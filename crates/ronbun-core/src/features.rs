//! Surface feature extraction.
//!
//! Derives the character counts, paragraph split, marker-phrase flags, and
//! pattern counts that the rubric scores against. Nothing here understands
//! grammar; every feature is a literal substring check or a simple scan.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Phrases that open a problem statement.
pub const INTRO_PHRASES: &[&str] = &["について", "において", "に関して"];

/// Phrases that introduce a conclusion.
pub const CONCLUSION_PHRASES: &[&str] = &["よって", "従って", "以上", "このように"];

/// Phrases that introduce a concrete example.
pub const EXAMPLE_PHRASES: &[&str] = &["例えば", "具体的に", "たとえば"];

/// Phrases that acknowledge an opposing view.
pub const COUNTER_PHRASES: &[&str] = &["一方", "しかし", "ただし", "もっとも"];

/// Connectors that make causal reasoning explicit.
pub const LOGICAL_CONNECTORS: &[&str] = &["そのため", "なぜなら", "理由は", "その結果", "このことから"];

/// Shortest substring that counts as an immediate repetition.
pub const MIN_REPEAT_CHARS: usize = 10;

/// Sentence length (in characters) at which a sentence counts as long.
pub const LONG_SENTENCE_CHARS: usize = 50;

/// Number of leading theme characters searched for in the essay.
pub const THEME_PREFIX_CHARS: usize = 10;

const SENTENCE_TERMINATOR: char = '。';

// ASCII digits only: full-width numerals do not count as data.
static NUMERIC_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+[%人件年]").expect("numeric data pattern is valid"));

/// Features derived from one essay, computed once per scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSet<'a> {
    /// Number of non-whitespace characters.
    pub character_count: usize,
    /// Non-blank lines, in order.
    pub paragraphs: Vec<&'a str>,
    pub has_intro_phrase: bool,
    pub has_conclusion_phrase: bool,
    pub has_example_phrase: bool,
    pub has_numeric_data: bool,
    pub has_counter_argument: bool,
    pub logical_connector_count: usize,
    pub repetition_count: usize,
    pub long_sentence_count: usize,
    pub mentions_theme_prefix: bool,
}

impl<'a> FeatureSet<'a> {
    /// Extract every feature from `text`, checking relevance against `theme`.
    pub fn extract(text: &'a str, theme: &str) -> Self {
        Self {
            character_count: character_count(text),
            paragraphs: paragraphs(text),
            has_intro_phrase: contains_any(text, INTRO_PHRASES),
            has_conclusion_phrase: contains_any(text, CONCLUSION_PHRASES),
            has_example_phrase: contains_any(text, EXAMPLE_PHRASES),
            has_numeric_data: NUMERIC_DATA_RE.is_match(text),
            has_counter_argument: contains_any(text, COUNTER_PHRASES),
            logical_connector_count: count_occurrences(text, LOGICAL_CONNECTORS),
            repetition_count: repetition_count(text),
            long_sentence_count: long_sentence_count(text),
            mentions_theme_prefix: mentions_theme_prefix(text, theme),
        }
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }
}

pub fn character_count(text: &str) -> usize {
    text.chars().filter(|&c| !is_blank(c)).count()
}

pub fn paragraphs(text: &str) -> Vec<&str> {
    text.split('\n')
        .filter(|line| !line.chars().all(is_blank))
        .collect()
}

/// Characters that neither count toward length nor make a line non-blank:
/// Unicode White_Space without NEL (U+0085), plus the byte-order mark.
pub fn is_blank(c: char) -> bool {
    match c {
        '\u{85}' => false,
        '\u{feff}' => true,
        c => c.is_whitespace(),
    }
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}

/// Total non-overlapping occurrences of every phrase, summed across phrases.
fn count_occurrences(text: &str, phrases: &[&str]) -> usize {
    phrases.iter().map(|p| text.matches(p).count()).sum()
}

/// Count immediate repeats: a run of at least [`MIN_REPEAT_CHARS`] characters
/// followed directly by an identical run.
///
/// Scanning is leftmost-first with the longest repeat preferred at each
/// position, and resumes after the end of each match, so matches never
/// overlap. Neither half may span a line break.
pub fn repetition_count(text: &str) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let line_ends = line_ends(&chars);

    // A repeat of length `len` at `start` needs the same character at
    // `start + len`, so only those offsets are worth comparing.
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (i, &c) in chars.iter().enumerate() {
        positions.entry(c).or_default().push(i);
    }

    let mut count = 0;
    let mut pos = 0;

    while pos + 2 * MIN_REPEAT_CHARS <= chars.len() {
        let same = positions.get(&chars[pos]).map_or(&[][..], Vec::as_slice);
        match longest_repeat_at(&chars, pos, line_ends[pos], same) {
            Some(len) => {
                count += 1;
                pos += 2 * len;
            }
            None => pos += 1,
        }
    }

    count
}

/// For each index, the index of the next line terminator (or the end).
fn line_ends(chars: &[char]) -> Vec<usize> {
    let mut ends = vec![chars.len(); chars.len()];
    let mut end = chars.len();
    for i in (0..chars.len()).rev() {
        if is_line_terminator(chars[i]) {
            end = i;
        }
        ends[i] = end;
    }
    ends
}

/// `same` lists, in ascending order, every index holding `chars[start]`.
fn longest_repeat_at(
    chars: &[char],
    start: usize,
    line_end: usize,
    same: &[usize],
) -> Option<usize> {
    let max_len = (line_end - start) / 2;
    if max_len < MIN_REPEAT_CHARS {
        return None;
    }

    let lo = same.partition_point(|&p| p < start + MIN_REPEAT_CHARS);
    let hi = same.partition_point(|&p| p <= start + max_len);
    same[lo..hi]
        .iter()
        .rev()
        .map(|&p| p - start)
        .find(|&len| chars[start..start + len] == chars[start + len..start + 2 * len])
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Count sentence terminators followed by at least [`LONG_SENTENCE_CHARS`]
/// characters before the next terminator or the end of the text.
///
/// Text before the first terminator is never counted.
pub fn long_sentence_count(text: &str) -> usize {
    text.split(SENTENCE_TERMINATOR)
        .skip(1)
        .filter(|sentence| sentence.chars().count() >= LONG_SENTENCE_CHARS)
        .count()
}

/// Whether the first [`THEME_PREFIX_CHARS`] characters of `theme` occur in
/// `text`. Shorter themes are matched whole; an empty theme always matches.
pub fn mentions_theme_prefix(text: &str, theme: &str) -> bool {
    let end = theme
        .char_indices()
        .nth(THEME_PREFIX_CHARS)
        .map_or(theme.len(), |(idx, _)| idx);
    text.contains(&theme[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_count_ignores_whitespace() {
        assert_eq!(character_count(""), 0);
        assert_eq!(character_count("あい う\nえ\tお"), 5);
        // Ideographic space is whitespace too.
        assert_eq!(character_count("あ\u{3000}い"), 2);
    }

    #[test]
    fn byte_order_mark_is_blank_but_next_line_is_not() {
        assert!(is_blank('\u{feff}'));
        assert!(!is_blank('\u{85}'));
        assert!(is_blank('\u{a0}'));

        let with_bom = format!("{}\u{feff}", "あ".repeat(99));
        assert_eq!(character_count(&with_bom), 99);
        let with_nel = format!("{}\u{85}", "あ".repeat(99));
        assert_eq!(character_count(&with_nel), 100);

        assert_eq!(paragraphs("本文。\n\u{feff}\n\u{85}"), vec!["本文。", "\u{85}"]);
    }

    #[test]
    fn paragraphs_drop_blank_lines() {
        let text = "序論です。\n\n  \n本論です。\n結論です。\n";
        assert_eq!(paragraphs(text), vec!["序論です。", "本論です。", "結論です。"]);
        assert!(paragraphs("").is_empty());
        assert!(paragraphs("\n \n").is_empty());
    }

    #[test]
    fn marker_phrases() {
        let f = FeatureSet::extract("環境問題について考える。例えば、しかし、以上。", "");
        assert!(f.has_intro_phrase);
        assert!(f.has_example_phrase);
        assert!(f.has_counter_argument);
        assert!(f.has_conclusion_phrase);

        let f = FeatureSet::extract("何もない文章。", "");
        assert!(!f.has_intro_phrase);
        assert!(!f.has_example_phrase);
        assert!(!f.has_counter_argument);
        assert!(!f.has_conclusion_phrase);
    }

    #[test]
    fn numeric_data_requires_unit() {
        assert!(FeatureSet::extract("参加者は30%増えた", "").has_numeric_data);
        assert!(FeatureSet::extract("50人が参加した", "").has_numeric_data);
        assert!(FeatureSet::extract("3件の事例", "").has_numeric_data);
        assert!(FeatureSet::extract("2020年に", "").has_numeric_data);
        assert!(!FeatureSet::extract("30 %", "").has_numeric_data);
        assert!(!FeatureSet::extract("３０％", "").has_numeric_data);
        assert!(!FeatureSet::extract("30個", "").has_numeric_data);
    }

    #[test]
    fn connectors_are_summed() {
        let text = "そのため、なぜなら、そのため。その結果このことから";
        assert_eq!(FeatureSet::extract(text, "").logical_connector_count, 5);
        assert_eq!(FeatureSet::extract("", "").logical_connector_count, 0);
    }

    #[test]
    fn repetition_needs_ten_characters() {
        assert_eq!(repetition_count("abcdefghiabcdefghi"), 0);
        assert_eq!(repetition_count("abcdefghijabcdefghij"), 1);
        assert_eq!(repetition_count(""), 0);
    }

    #[test]
    fn repetition_prefers_longest_and_does_not_overlap() {
        let unit = "あいうえおかきくけこさし";
        // Three back-to-back copies: one 12-char repeat, then a lone copy.
        assert_eq!(repetition_count(&unit.repeat(3)), 1);
        // Four copies pair up as one 24-char repeat.
        assert_eq!(repetition_count(&unit.repeat(4)), 1);
    }

    #[test]
    fn repetition_does_not_cross_line_breaks() {
        let unit = "abcdefghijkl";
        assert_eq!(repetition_count(&format!("{unit}\n{unit}")), 0);
        let text = format!("{unit}{unit}\n{unit}{unit}\n{unit}{unit}");
        assert_eq!(repetition_count(&text), 3);
    }

    #[test]
    fn repetition_counts_separated_pairs() {
        let unit = "abcdefghijkl";
        let text = format!("{unit}{unit}。{unit}{unit}。{unit}{unit}");
        // The longest repeat at the start spans "XX。XX。", leaving one more.
        assert_eq!(repetition_count(&text), 2);
    }

    /// Straightforward scan: try every length at every position.
    fn repetition_count_reference(text: &str) -> usize {
        let chars: Vec<char> = text.chars().collect();
        let (mut count, mut pos) = (0, 0);
        while pos + 2 * MIN_REPEAT_CHARS <= chars.len() {
            let run = chars[pos..]
                .iter()
                .take_while(|c| !is_line_terminator(**c))
                .count();
            let found = (MIN_REPEAT_CHARS..=run / 2)
                .rev()
                .find(|&len| chars[pos..pos + len] == chars[pos + len..pos + 2 * len]);
            match found {
                Some(len) => {
                    count += 1;
                    pos += 2 * len;
                }
                None => pos += 1,
            }
        }
        count
    }

    #[test]
    fn repetition_matches_exhaustive_scan() {
        let mut rng = fastrand::Rng::with_seed(11);
        let alphabet = ['あ', 'い', 'う', '。', '\n'];
        let units = ["あいうえおかきくけこ", "さしすせそたちつてとな"];
        for _ in 0..300 {
            let mut text = String::new();
            for _ in 0..rng.usize(0..40) {
                if rng.u8(..4) == 0 {
                    text.push_str(units[rng.usize(..units.len())]);
                } else {
                    text.push(alphabet[rng.usize(..alphabet.len())]);
                }
            }
            assert_eq!(
                repetition_count(&text),
                repetition_count_reference(&text),
                "{text:?}"
            );
        }
    }

    #[test]
    fn repetition_scan_handles_long_single_line() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut text: String = (0..50_000)
            .map(|_| char::from_u32(0x4E00 + rng.u32(..3000)).unwrap_or('字'))
            .collect();
        assert_eq!(repetition_count(&text), 0);

        let unit = "同じ表現を何度も繰り返す";
        text.push_str(&unit.repeat(2));
        assert_eq!(repetition_count(&text), 1);
    }

    #[test]
    fn long_sentences_follow_a_terminator() {
        let long = "あ".repeat(50);
        let short = "い".repeat(49);
        // Leading text without a terminator never counts.
        assert_eq!(long_sentence_count(&long), 0);
        assert_eq!(long_sentence_count(&format!("{long}。{long}")), 1);
        assert_eq!(long_sentence_count(&format!("前。{short}。")), 0);
        assert_eq!(long_sentence_count(&format!("前。{long}。{long}")), 2);
        // Line breaks are part of the sentence.
        let split = format!("前。{}\n{}", "う".repeat(30), "え".repeat(19));
        assert_eq!(long_sentence_count(&split), 1);
    }

    #[test]
    fn theme_prefix_uses_first_ten_characters() {
        let theme = "デジタル社会における民主主義の課題";
        assert!(mentions_theme_prefix("私はデジタル社会における課題を", theme));
        assert!(!mentions_theme_prefix("デジタル社会の課題", theme));
        assert!(mentions_theme_prefix("短いテーマを含む", "短いテーマ"));
        assert!(mentions_theme_prefix("anything", ""));
        assert!(!mentions_theme_prefix("", "テーマ"));
    }
}
