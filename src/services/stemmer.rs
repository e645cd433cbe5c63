//! Porter suffix-stripping stemmer.
//!
//! Porter, M.F. (1980). "An algorithm for suffix stripping."
//! Program, 14(3), 130-137.
//!
//! Rule-based only; no dictionary. Input is expected to be lowercase.
//! Anything that is not a vowel counts as a consonant, so digits and
//! punctuation pass through untouched.

/// Step 2 rules, tried in order; the first suffix that matches decides.
const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("logi", "log"),
];

const STEP3_RULES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4_SUFFIXES: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// `y` is a consonant at the start of a word or after a vowel
fn is_consonant(word: &[char], i: usize) -> bool {
    match word[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences in `word[..len]`
fn measure(word: &[char], len: usize) -> usize {
    let mut count = 0;
    let mut i = 0;

    while i < len && is_consonant(word, i) {
        i += 1;
    }
    loop {
        while i < len && !is_consonant(word, i) {
            i += 1;
        }
        if i >= len {
            return count;
        }
        while i < len && is_consonant(word, i) {
            i += 1;
        }
        count += 1;
        if i >= len {
            return count;
        }
    }
}

fn has_vowel(word: &[char], len: usize) -> bool {
    (0..len).any(|i| !is_consonant(word, i))
}

fn ends_with_double_consonant(word: &[char], len: usize) -> bool {
    len >= 2 && word[len - 1] == word[len - 2] && is_consonant(word, len - 1)
}

/// consonant-vowel-consonant ending, last consonant not w, x or y
fn ends_with_cvc(word: &[char], len: usize) -> bool {
    len >= 3
        && is_consonant(word, len - 3)
        && !is_consonant(word, len - 2)
        && is_consonant(word, len - 1)
        && !matches!(word[len - 1], 'w' | 'x' | 'y')
}

fn ends_with(word: &[char], suffix: &str) -> bool {
    let suffix_len = suffix.chars().count();
    suffix_len <= word.len() && word[word.len() - suffix_len..].iter().copied().eq(suffix.chars())
}

/// Length of `word` without `suffix`; caller has checked `ends_with`
fn stem_len(word: &[char], suffix: &str) -> usize {
    word.len() - suffix.chars().count()
}

fn replace_suffix(word: &mut Vec<char>, suffix: &str, replacement: &str) {
    let len = stem_len(word, suffix);
    word.truncate(len);
    word.extend(replacement.chars());
}

/// Applies the first matching rule when the remaining stem has measure > 0
fn apply_rules(word: &mut Vec<char>, rules: &[(&str, &str)]) {
    if let Some((suffix, replacement)) = rules.iter().find(|(suffix, _)| ends_with(word, suffix)) {
        if measure(word, stem_len(word, suffix)) > 0 {
            replace_suffix(word, suffix, replacement);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    pub fn new() -> Self {
        Self
    }

    /// Reduces a single word to its stem
    pub fn stem(&self, word: &str) -> String {
        let mut chars: Vec<char> = word.chars().collect();
        if chars.len() <= 2 {
            return word.to_string();
        }

        Self::step1a(&mut chars);
        Self::step1b(&mut chars);
        Self::step1c(&mut chars);
        apply_rules(&mut chars, STEP2_RULES);
        apply_rules(&mut chars, STEP3_RULES);
        Self::step4(&mut chars);
        Self::step5(&mut chars);

        chars.into_iter().collect()
    }

    /// Plurals
    fn step1a(word: &mut Vec<char>) {
        if ends_with(word, "sses") || ends_with(word, "ies") {
            word.truncate(word.len() - 2);
        } else if ends_with(word, "s") && !ends_with(word, "ss") {
            word.pop();
        }
    }

    /// -eed, -ed, -ing
    fn step1b(word: &mut Vec<char>) {
        if ends_with(word, "eed") {
            if measure(word, stem_len(word, "eed")) > 0 {
                word.pop();
            }
            return;
        }

        let stripped = ["ed", "ing"].into_iter().find(|suffix| {
            ends_with(word, suffix) && has_vowel(word, stem_len(word, suffix))
        });
        let Some(suffix) = stripped else {
            return;
        };
        let len = stem_len(word, suffix);
        word.truncate(len);

        if ends_with(word, "at") || ends_with(word, "bl") || ends_with(word, "iz") {
            word.push('e');
        } else if ends_with_double_consonant(word, word.len())
            && !matches!(word[word.len() - 1], 'l' | 's' | 'z')
        {
            word.pop();
        } else if measure(word, word.len()) == 1 && ends_with_cvc(word, word.len()) {
            word.push('e');
        }
    }

    /// Terminal y to i when the stem has a vowel
    fn step1c(word: &mut Vec<char>) {
        if ends_with(word, "y") && has_vowel(word, word.len() - 1) {
            let last = word.len() - 1;
            word[last] = 'i';
        }
    }

    fn step4(word: &mut Vec<char>) {
        let Some(suffix) = STEP4_SUFFIXES.iter().find(|suffix| ends_with(word, suffix)) else {
            return;
        };
        let len = stem_len(word, suffix);
        if *suffix == "ion" && !(len > 0 && matches!(word[len - 1], 's' | 't')) {
            return;
        }
        if measure(word, len) > 1 {
            word.truncate(len);
        }
    }

    fn step5(word: &mut Vec<char>) {
        if ends_with(word, "e") {
            let len = word.len() - 1;
            let m = measure(word, len);
            if m > 1 || (m == 1 && !ends_with_cvc(word, len)) {
                word.truncate(len);
            }
        }

        if ends_with(word, "ll") && measure(word, word.len()) > 1 {
            word.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stem(word: &str) -> String {
        PorterStemmer::new().stem(word)
    }

    #[test]
    fn test_plurals() {
        assert_eq!(stem("caresses"), "caress");
        assert_eq!(stem("ponies"), "poni");
        assert_eq!(stem("caress"), "caress");
        assert_eq!(stem("cats"), "cat");
    }

    #[test]
    fn test_ed_and_ing() {
        assert_eq!(stem("feed"), "feed");
        assert_eq!(stem("agreed"), "agre");
        assert_eq!(stem("plastered"), "plaster");
        assert_eq!(stem("motoring"), "motor");
        assert_eq!(stem("sing"), "sing");
        assert_eq!(stem("conflated"), "conflat");
        assert_eq!(stem("hopping"), "hop");
        assert_eq!(stem("filing"), "file");
        assert_eq!(stem("running"), "run");
    }

    #[test]
    fn test_y_to_i() {
        assert_eq!(stem("happy"), "happi");
        assert_eq!(stem("sky"), "sky");
    }

    #[test]
    fn test_derivational_suffixes() {
        assert_eq!(stem("relational"), "relat");
        assert_eq!(stem("rational"), "ration");
        assert_eq!(stem("generalization"), "gener");
        assert_eq!(stem("hopeful"), "hope");
        assert_eq!(stem("goodness"), "good");
        assert_eq!(stem("adoption"), "adopt");
        assert_eq!(stem("revival"), "reviv");
    }

    #[test]
    fn test_final_e_and_ll() {
        assert_eq!(stem("probate"), "probat");
        assert_eq!(stem("rate"), "rate");
        assert_eq!(stem("controll"), "control");
        assert_eq!(stem("roll"), "roll");
        assert_eq!(stem("space"), "space");
        assert_eq!(stem("love"), "love");
    }

    #[test]
    fn test_short_and_odd_input() {
        assert_eq!(stem(""), "");
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("war"), "war");
        assert_eq!(stem("22nd"), "22nd");
        assert_eq!(stem("world."), "world.");
    }

    #[test]
    fn test_measure() {
        let word = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(measure(&word("tree"), 4), 0);
        assert_eq!(measure(&word("trouble"), 7), 1);
        assert_eq!(measure(&word("oaten"), 5), 2);
        assert_eq!(measure(&word("private"), 7), 2);
    }
}
