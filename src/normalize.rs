//! Letter normalization.
//!
//! Secrets and guesses are reduced to the 26 ASCII capitals. Words go through
//! diacritic folding first so `"Canción"` plays as `CANCION`; single-letter
//! guesses do not, so a lone accented key press is ignored.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Uppercase and keep only `A`..=`Z`.
///
/// ```
/// use hangman::normalize::normalize_letters;
///
/// assert_eq!(normalize_letters("ga-to!"), "GATO");
/// assert_eq!(normalize_letters("ó"), "");
/// ```
pub fn normalize_letters(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Normalize a raw word for use as a secret: strip diacritics, then
/// [`normalize_letters`].
///
/// ```
/// use hangman::normalize::normalize_word;
///
/// assert_eq!(normalize_word("Canción"), "CANCION");
/// assert_eq!(normalize_word("pingüino 2"), "PINGUINO");
/// ```
pub fn normalize_word(raw: &str) -> String {
    let folded: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();
    normalize_letters(&folded)
}

/// Normalize a single guess. Returns `None` unless exactly one letter
/// survives.
pub fn normalize_letter(raw: &str) -> Option<char> {
    let mut letters = normalize_letters(raw).into_bytes().into_iter();
    match (letters.next(), letters.next()) {
        (Some(letter), None) => Some(char::from(letter)),
        _ => None,
    }
}
