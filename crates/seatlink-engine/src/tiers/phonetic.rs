//! Tier 5: phonetic-code agreement, the last resort for transliteration
//! and spelling variants that defeat character-level similarity.

use seatlink_core::types::MatchMethod;
use strsim::jaro_winkler;

use super::{judge_scores, MatchTier, TierInput, TierOutcome};

/// Score assigned to a phonetic code agreement before blending.
const CODE_MATCH_SCORE: f64 = 0.9;
const PHONETIC_WEIGHT: f64 = 0.4;
const FUZZY_WEIGHT: f64 = 0.6;

/// Candidates whose Soundex or consonant-skeleton signature agrees with
/// the record's get a blended score of `0.4 * 0.9 + 0.6 * jaro_winkler`;
/// everyone else is out. The blend keeps a bare code collision from
/// outscoring a candidate the earlier tiers already found wanting.
pub struct PhoneticTier;

impl MatchTier for PhoneticTier {
    fn method(&self) -> MatchMethod {
        MatchMethod::Phonetic
    }

    fn evaluate(&self, input: &TierInput<'_>) -> TierOutcome {
        let query_soundex = soundex(&input.ctx.name);
        let query_skeleton = consonant_skeleton(&input.ctx.name);
        if query_soundex.is_empty() && query_skeleton.is_empty() {
            return TierOutcome::Skip;
        }
        let scores: Vec<_> = input
            .candidates
            .iter()
            .filter_map(|college| {
                let name = input.index.normalized_name(&college.id);
                let agrees = (!query_soundex.is_empty() && query_soundex == soundex(name))
                    || (!query_skeleton.is_empty() && query_skeleton == consonant_skeleton(name));
                if !agrees {
                    return None;
                }
                let blended = PHONETIC_WEIGHT * CODE_MATCH_SCORE
                    + FUZZY_WEIGHT * jaro_winkler(&input.ctx.name, name);
                Some((college.id.clone(), blended))
            })
            .collect();
        if scores.is_empty() {
            return TierOutcome::Skip;
        }
        judge_scores(
            scores,
            input.thresholds.phonetic_accept,
            0.0,
            input.thresholds.tie_epsilon,
        )
    }
}

/// Per-word American Soundex signature, words joined by a space.
pub fn soundex(name: &str) -> String {
    let codes: Vec<String> = name.split_whitespace().map(soundex_word).collect();
    codes.join(" ")
}

fn soundex_word(word: &str) -> String {
    let mut letters = word.chars().filter(|c| c.is_ascii_alphabetic());
    let Some(first) = letters.next() else {
        return String::new();
    };
    let first = first.to_ascii_uppercase();
    let mut code = String::with_capacity(4);
    code.push(first);
    let mut last_digit = soundex_digit(first);
    for letter in letters {
        let upper = letter.to_ascii_uppercase();
        let digit = soundex_digit(upper);
        if digit != 0 && digit != last_digit {
            code.push(char::from(b'0' + digit));
            if code.len() == 4 {
                break;
            }
        }
        // H and W do not break a run of same-coded consonants; vowels do.
        if !matches!(upper, 'H' | 'W') {
            last_digit = digit;
        }
    }
    while code.len() < 4 {
        code.push('0');
    }
    code
}

fn soundex_digit(letter: char) -> u8 {
    match letter {
        'B' | 'F' | 'P' | 'V' => 1,
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => 2,
        'D' | 'T' => 3,
        'L' => 4,
        'M' | 'N' => 5,
        'R' => 6,
        _ => 0,
    }
}

/// Per-word consonant skeleton, words joined by a space. The first letter
/// is always kept; later vowels are dropped and repeated consonants
/// collapse unless a vowel sits between them, so RAJIV and RAJEEV agree
/// while BABA keeps both Bs.
pub fn consonant_skeleton(name: &str) -> String {
    let words: Vec<String> = name.split_whitespace().map(skeleton_word).collect();
    words.join(" ")
}

fn skeleton_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut last = '\0';
    for (i, letter) in word.chars().filter(|c| c.is_ascii_alphabetic()).enumerate() {
        let upper = letter.to_ascii_uppercase();
        if i == 0 {
            out.push(upper);
            last = upper;
            continue;
        }
        if matches!(upper, 'A' | 'E' | 'I' | 'O' | 'U') {
            last = '\0';
            continue;
        }
        if upper != last {
            out.push(upper);
            last = upper;
        }
    }
    out
}
