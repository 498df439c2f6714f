use regex::Regex;
use std::sync::LazyLock;

static TRAILING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{4})\)\s*$").expect("valid trailing year pattern"));

static SLUG_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d{4})$").expect("valid slug year pattern"));

/// Split "Sinners (2025)" into ("Sinners", Some(2025)).
pub fn split_title_year(raw: &str) -> (String, Option<u32>) {
    let raw = raw.trim();
    if let Some(caps) = TRAILING_YEAR.captures(raw) {
        let year = caps[1].parse::<u32>().ok();
        let start = caps.get(0).map(|m| m.start()).unwrap_or(raw.len());
        let title = raw[..start].trim();
        if !title.is_empty() {
            return (title.to_string(), year);
        }
    }
    (raw.to_string(), None)
}

/// Year suffix of a film slug such as "heat-1995".
pub fn year_from_slug(slug: &str) -> Option<u32> {
    SLUG_YEAR
        .captures(slug.trim_end_matches('/'))
        .and_then(|caps| caps[1].parse::<u32>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_title_year() {
        assert_eq!(split_title_year("Sinners (2025)"), ("Sinners".to_string(), Some(2025)));
        assert_eq!(split_title_year("  Heat  "), ("Heat".to_string(), None));
        assert_eq!(
            split_title_year("2001: A Space Odyssey (1968)"),
            ("2001: A Space Odyssey".to_string(), Some(1968))
        );
        // A bare year is a title, not a year
        assert_eq!(split_title_year("(1984)"), ("(1984)".to_string(), None));
        assert_eq!(split_title_year("1917"), ("1917".to_string(), None));
    }

    #[test]
    fn test_year_from_slug() {
        assert_eq!(year_from_slug("heat-1995"), Some(1995));
        assert_eq!(year_from_slug("heat"), None);
        assert_eq!(year_from_slug("blade-runner-2049"), Some(2049));
    }
}
