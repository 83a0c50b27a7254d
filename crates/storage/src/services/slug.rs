/// Latin spelling for Cyrillic letters used in Russian and Kazakh names.
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        'і' => "i",
        'ї' => "yi",
        'є' => "ye",
        'ғ' => "gh",
        'қ' => "q",
        'ң' => "ng",
        'ө' => "o",
        'ұ' | 'ү' => "u",
        'һ' => "h",
        'ә' => "a",
        _ => return None,
    };
    Some(latin)
}

/// Builds a URL slug from a (possibly Cyrillic) title.
///
/// Returns `fallback` when nothing usable survives.
pub fn slugify(title: &str, fallback: &str) -> String {
    let mut latin = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        match transliterate(c) {
            Some(s) => latin.push_str(s),
            None => latin.push(c),
        }
    }

    let slug = latin
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

/// Candidate slug for the `attempt`-th collision (`base`, `base-2`, `base-3`, ...).
pub fn with_suffix(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_russian_name() {
        assert_eq!(slugify("Иван Петров", "athlete"), "ivan-petrov");
    }

    #[test]
    fn test_kazakh_letters() {
        assert_eq!(slugify("Әлия Құрманова", "athlete"), "aliya-qurmanova");
        assert_eq!(slugify("Ғалым Төреұлы", "athlete"), "ghalym-toreuly");
    }

    #[test]
    fn test_punctuation_and_spacing() {
        assert_eq!(
            slugify("  Кубок РК -- 2025!  ", "news"),
            "kubok-rk-2025"
        );
        assert_eq!(slugify("Hello_World", "news"), "hello-world");
    }

    #[test]
    fn test_fallback_when_empty() {
        assert_eq!(slugify("!!!", "athlete"), "athlete");
        assert_eq!(slugify("", "news"), "news");
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(with_suffix("ivan-petrov", 1), "ivan-petrov");
        assert_eq!(with_suffix("ivan-petrov", 2), "ivan-petrov-2");
        assert_eq!(with_suffix("ivan-petrov", 3), "ivan-petrov-3");
    }
}
