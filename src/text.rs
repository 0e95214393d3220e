//! Prompt normalization: Turkish diacritics to ASCII and filename slugs.

pub const MAX_FILENAME_CHARS: usize = 50;

const TURKISH_CHARS: [(char, char); 12] = [
    ('ç', 'c'),
    ('ğ', 'g'),
    ('ı', 'i'),
    ('ö', 'o'),
    ('ş', 's'),
    ('ü', 'u'),
    ('Ç', 'C'),
    ('Ğ', 'G'),
    ('İ', 'I'),
    ('Ö', 'O'),
    ('Ş', 'S'),
    ('Ü', 'U'),
];

fn map_char(c: char) -> char {
    TURKISH_CHARS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

pub fn is_mapped_char(c: char) -> bool {
    TURKISH_CHARS.iter().any(|(from, _)| *from == c)
}

/// Translation-safe variant of `text`.
pub fn replace_turkish_chars(text: &str) -> String {
    text.chars().map(map_char).collect()
}

/// Filename-safe slug: mapped diacritics, word characters only, whitespace
/// and hyphen runs collapsed to `_`, at most 50 characters.
pub fn clean_filename(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_separator = false;

    for c in replace_turkish_chars(text).chars() {
        if c.is_whitespace() || c == '-' {
            if !in_separator {
                slug.push('_');
                in_separator = true;
            }
        } else if c.is_alphanumeric() || c == '_' {
            slug.push(c);
            in_separator = false;
        }
        // Anything else is dropped without ending a separator run.
    }

    slug.chars().take(MAX_FILENAME_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_turkish_chars() {
        assert_eq!(replace_turkish_chars("gün batımında sahil"), "gun batiminda sahil");
        assert_eq!(replace_turkish_chars("ÇĞİÖŞÜ"), "CGIOSU");
        assert_eq!(replace_turkish_chars(""), "");
    }

    #[test]
    fn test_clean_filename_basic() {
        assert_eq!(clean_filename("mavi gökyüzünde uçan kedi"), "mavi_gokyuzunde_ucan_kedi");
        assert_eq!(clean_filename("cyberpunk, neon - city!"), "cyberpunk_neon_city");
        assert_eq!(clean_filename("  leading"), "_leading");
        assert_eq!(clean_filename(""), "");
    }

    #[test]
    fn test_clean_filename_drops_punctuation_inside_separator_runs() {
        assert_eq!(clean_filename("a - , - b"), "a_b");
        assert_eq!(clean_filename("snake_case stays"), "snake_case_stays");
    }

    #[test]
    fn test_clean_filename_never_keeps_mapped_chars_and_is_bounded() {
        let inputs = [
            "şşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşşş",
            "Van Gogh tarzında ayçiçeği tarlası ve ÇOK güzel ĞÜŞİÖÇ manzara, detaylı",
            "ığüşöç",
        ];
        for input in inputs {
            let slug = clean_filename(input);
            assert!(slug.chars().count() <= MAX_FILENAME_CHARS, "{}", slug);
            assert!(!slug.chars().any(is_mapped_char), "{}", slug);
        }
    }

    #[test]
    fn test_clean_filename_truncates_on_char_boundary() {
        let long = "é".repeat(80);
        let slug = clean_filename(&long);
        assert_eq!(slug.chars().count(), 50);
    }
}
