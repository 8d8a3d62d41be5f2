//! Slug generation with Cyrillic transliteration.
//!
//! Campaign slugs are URL-safe ASCII derived from possibly-Ukrainian titles.
//! Uniqueness (the `-1`, `-2` suffixing) lives in the campaign repository,
//! which is the only place that can see existing slugs.

/// Maximum length of a generated base slug before the uniqueness suffix.
pub const MAX_SLUG_LEN: usize = 240;

/// Transliterates a single Cyrillic character to its Latin rendering.
///
/// Covers the Ukrainian and Russian alphabets. Characters without a mapping
/// return None and are dropped by the slugifier.
fn transliterate(c: char) -> Option<&'static str> {
    Some(match c {
        'а' => "a", 'б' => "b", 'в' => "v", 'г' => "g", 'ґ' => "g",
        'д' => "d", 'е' => "e", 'є' => "ie", 'ё' => "e", 'ж' => "zh",
        'з' => "z", 'и' => "y", 'і' => "i", 'ї' => "i", 'й' => "i",
        'к' => "k", 'л' => "l", 'м' => "m", 'н' => "n", 'о' => "o",
        'п' => "p", 'р' => "r", 'с' => "s", 'т' => "t", 'у' => "u",
        'ф' => "f", 'х' => "kh", 'ц' => "ts", 'ч' => "ch", 'ш' => "sh",
        'щ' => "shch", 'ы' => "y", 'э' => "e", 'ю' => "iu", 'я' => "ia",
        'ь' | 'ъ' | '\'' => "",
        _ => return None,
    })
}

/// Builds a URL-safe slug from a title.
///
/// Lowercases, transliterates Cyrillic, keeps ASCII alphanumerics, and
/// collapses everything else into single hyphens. Returns an empty string
/// when nothing sluggable remains (the caller substitutes a random slug).
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        let mapped: Option<String> = if c.is_ascii_alphanumeric() {
            Some(c.to_string())
        } else {
            transliterate(c).map(str::to_string)
        };

        match mapped {
            Some(s) => {
                if pending_hyphen && !out.is_empty() && !s.is_empty() {
                    out.push('-');
                }
                if !s.is_empty() {
                    pending_hyphen = false;
                }
                out.push_str(&s);
            }
            None => pending_hyphen = true,
        }
        if out.len() >= MAX_SLUG_LEN {
            break;
        }
    }

    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_ukrainian_title() {
        assert_eq!(slugify("Допомога"), "dopomoga");
    }

    #[test]
    fn test_slugify_mixed_words() {
        assert_eq!(slugify("Допомога дітям 2024"), "dopomoga-ditiam-2024");
    }

    #[test]
    fn test_slugify_ascii() {
        assert_eq!(slugify("Winter Shelter Drive"), "winter-shelter-drive");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  a -- b  "), "a-b");
    }

    #[test]
    fn test_slugify_soft_sign_dropped() {
        assert_eq!(slugify("Львів"), "lviv");
    }

    #[test]
    fn test_slugify_unmappable_only() {
        assert_eq!(slugify("★☆★"), "");
    }

    #[test]
    fn test_slugify_truncates_long_titles() {
        let long = "а".repeat(1000);
        assert!(slugify(&long).len() <= MAX_SLUG_LEN);
    }
}
