//! Spelling-based syllable estimation.
//!
//! Infers the number of syllables in an English word from its letters alone,
//! with no dictionary and no phonetic model. The rules are ordered corrections
//! to a running count; all of them read the original word, never an
//! intermediate rewrite of it.
//!
//! Input must be a normalized word: lowercase ASCII letters, at least one of
//! them. See [`crate::text::Word`] for the validated form.
//!
//! Based on <http://jzimba.blogspot.com/2017/07/an-algorithm-for-counting-syllables.html>.

/// Trailing vowel pairs that span two syllables ("idea", "radii", "ratio").
const TWO_SYLLABLE_ENDINGS: [&[u8; 2]; 5] = [b"ea", b"ii", b"io", b"ua", b"uo"];

/// Returns `true` for the letters treated as vowels: `a e i o u y`.
///
/// `y` is always a vowel, in every rule.
pub const fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u' | b'y')
}

/// Estimate the syllable count of a normalized word.
///
/// Always returns at least 1. Behaviour on an empty string or on characters
/// outside `a..=z` is unspecified; callers normalize first.
///
/// ```
/// use syllabic_core::syllables::estimate;
///
/// assert_eq!(estimate("wanted"), 2);
/// assert_eq!(estimate("aeiou"), 5);
/// ```
pub fn estimate(word: &str) -> usize {
    debug_assert!(
        !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase()),
        "estimate expects a normalized word, got {word:?}"
    );

    let w = word.as_bytes();
    let len = w.len();

    if w.iter().all(|&c| is_vowel(c)) {
        return len;
    }

    let mut count = cluster_count(w);

    if len > 4 && w.ends_with(b"ious") {
        count += 1;
    }
    if len > 3 && w.ends_with(b"ier") {
        count += 1;
    }

    // The `ed`/`es` pair itself was counted above, so this never underflows.
    if has_silent_suffix(w) {
        count = count.saturating_sub(1);
    }

    count += final_syllable(w);

    count.max(1)
}

/// Count vowel-to-consonant transitions plus the `ia` and `eo` splits.
///
/// The three tests are independent and may all fire on one pair.
fn cluster_count(w: &[u8]) -> usize {
    w.windows(2)
        .map(|pair| {
            let (first, second) = (pair[0], pair[1]);
            usize::from(is_vowel(first) && !is_vowel(second))
                + usize::from(pair == b"ia")
                + usize::from(pair == b"eo")
        })
        .sum()
}

/// Whether an `ed` or `es` ending should be treated as non-syllabic.
///
/// Only the letter before the ending (and for `r`/`l`, the one before that)
/// is consulted. Each disqualifying letter is its own branch.
fn has_silent_suffix(w: &[u8]) -> bool {
    let len = w.len();
    if len <= 2 {
        return false;
    }
    let before = w[len - 3];

    if w.ends_with(b"ed") {
        match before {
            b'd' | b't' => false,
            // "red" keeps the subtraction; any longer word ending in "red"
            // (single or double r) cancels it.
            b'r' => len <= 3,
            // Consonant + l ("cycled") keeps the syllable.
            b'l' => len <= 3 || is_vowel(w[len - 4]),
            _ => true,
        }
    } else if w.ends_with(b"es") && len > 3 {
        match before {
            b'c' | b'g' | b'x' | b's' | b'z' => false,
            b'l' if len > 4 => !is_vowel(w[len - 4]),
            _ => true,
        }
    } else {
        false
    }
}

/// Contribution of the word's final letters: 2, 1 or 0.
fn final_syllable(w: &[u8]) -> usize {
    let len = w.len();
    let Some(&last) = w.last() else {
        return 1;
    };

    let mut contribution = 1;
    if len > 1 {
        let tail = &w[len - 2..];
        if TWO_SYLLABLE_ENDINGS.iter().any(|ending| tail == ending.as_slice()) {
            contribution = 2;
        }
    }
    if last == b'e' && (len <= 1 || !is_vowel(w[len - 2])) {
        contribution = 0;
    }
    if !is_vowel(last) {
        contribution = 0;
    }
    contribution
}
