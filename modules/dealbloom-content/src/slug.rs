//! URL slug derivation for generated posts.

use chrono::Utc;

/// Slugify a post title and suffix it with a millisecond timestamp. Keeps
/// ASCII word characters and Korean syllables; everything else is dropped
/// before whitespace runs collapse to single hyphens.
pub fn generate_slug(title: &str, millis: i64) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|&c| is_slug_char(c) || c.is_whitespace())
        .collect();

    let hyphenated = kept.split_whitespace().collect::<Vec<_>>().join("-");

    format!("{}-{}", hyphenated.trim_matches('-'), millis)
}

/// Slug for the current moment. The timestamp suffix keeps repeated titles
/// from colliding on the unique slug column.
pub fn generate_slug_now(title: &str) -> String {
    generate_slug(title, Utc::now().timestamp_millis())
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || ('가'..='힣').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_fixed_timestamp() {
        assert_eq!(
            generate_slug("겨울 패션 특가", 42),
            generate_slug("겨울 패션 특가", 42)
        );
        assert_eq!(generate_slug("겨울 패션 특가", 42), "겨울-패션-특가-42");
    }

    #[test]
    fn same_title_different_timestamps_never_collide() {
        let a = generate_slug("같은 제목", 1_700_000_000_000);
        let b = generate_slug("같은 제목", 1_700_000_000_001);
        assert_ne!(a, b);
    }

    #[test]
    fn strips_specials_and_lowercases() {
        assert_eq!(
            generate_slug("Winter Sale: 50% OFF!", 42),
            "winter-sale-50-off-42"
        );
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(generate_slug("Big   Deal", 42), "big-deal-42");
    }

    #[test]
    fn title_with_only_specials_keeps_the_timestamp() {
        assert_eq!(generate_slug("!!!", 42), "-42");
    }
}
