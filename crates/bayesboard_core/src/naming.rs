//! Pronounceable node names and node colors.

use crate::random::RandomSource;

const START_BLENDS: [&str; 35] = [
    "bl", "br", "ch", "cl", "cr", "dr", "fl", "fr", "gl", "gr", "pl", "pr", "sc", "sh", "sk", "sl",
    "sm", "sn", "sp", "st", "sw", "th", "tr", "tw", "wh", "wr", "sch", "scr", "shr", "sph", "spl",
    "squ", "str", "thr", "qu",
];

const END_BLENDS: [&str; 12] = [
    "nt", "ck", "mp", "ch", "st", "nth", "ll", "sh", "th", "rs", "ght", "sk",
];

// English letter frequencies, roughly.
const CONSONANTS: [(&str, f64); 21] = [
    ("b", 1.492),
    ("c", 2.782),
    ("d", 4.253),
    ("f", 2.228),
    ("g", 2.014),
    ("h", 6.094),
    ("j", 6.966),
    ("k", 0.153),
    ("l", 4.025),
    ("m", 2.406),
    ("n", 6.749),
    ("p", 1.929),
    ("qu", 0.095),
    ("r", 5.987),
    ("s", 6.327),
    ("t", 9.056),
    ("v", 0.978),
    ("w", 2.360),
    ("x", 0.150),
    ("y", 1.974),
    ("z", 0.074),
];

const VOWELS: [(&str, f64); 11] = [
    ("a", 5.0),
    ("ai", 1.0),
    ("e", 6.0),
    ("ei", 1.0),
    ("ea", 1.0),
    ("i", 5.0),
    ("ie", 1.0),
    ("o", 5.0),
    ("ou", 1.0),
    ("u", 1.0),
    ("ui", 1.0),
];

/// Alternating consonant/vowel name of 5 to 7 syllable slots.
///
/// Even slots are consonants (a start blend may open the name, an end blend
/// may close it), odd slots are vowels.
pub fn random_name<R: RandomSource>(rng: &mut R) -> String {
    let len = rng.int_between(5, 7).unwrap_or(5);
    let mut name = String::new();
    for i in 0..len {
        let part = if i == 0 && rng.bool_with_prob(0.5) {
            rng.choice(&START_BLENDS).copied()
        } else if i % 2 == 0 {
            if i == len - 1 && rng.bool_with_prob(0.3) {
                rng.choice(&END_BLENDS).copied()
            } else {
                rng.multinomial_choice(&CONSONANTS).copied()
            }
        } else {
            rng.multinomial_choice(&VOWELS).copied()
        };
        name.push_str(part.unwrap_or_default());
    }
    name
}

/// Uniform 24-bit RGB color.
pub fn random_color<R: RandomSource>(rng: &mut R) -> u32 {
    rng.int_between(0, 0x00ff_ffff).unwrap_or(0) as u32
}

/// Capitalizes the first letter, for displaying game titles.
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
