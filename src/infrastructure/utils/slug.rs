//! Deterministic URL slugs for article titles.
//!
//! Runs of CJK ideographs are transliterated to toneless pinyin (one syllable
//! per hyphen-separated segment); everything else goes through `slug::slugify`.
//! `"你好 World"` becomes `ni-hao-world`.

use pinyin::ToPinyin;
use slug::slugify;

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// Splits `title` into maximal runs that are either all CJK or all non-CJK.
fn segments(title: &str) -> Vec<(bool, String)> {
    let mut segments: Vec<(bool, String)> = Vec::new();

    for c in title.chars() {
        let cjk = is_cjk(c);
        match segments.last_mut() {
            Some((last_cjk, segment)) if *last_cjk == cjk => segment.push(c),
            _ => segments.push((cjk, c.to_string())),
        }
    }

    segments
}

fn romanize(segment: &str) -> String {
    segment
        .to_pinyin()
        .flatten()
        .map(|syllable| syllable.plain())
        .collect::<Vec<_>>()
        .join("-")
}

/// Builds a slug containing only `[a-z0-9-]`, with no leading, trailing or
/// repeated hyphens. Titles with nothing representable produce an empty string.
pub fn generate_slug(title: &str) -> String {
    let joined = segments(title)
        .into_iter()
        .map(|(cjk, segment)| if cjk { romanize(&segment) } else { slugify(&segment) })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    // slugify has already collapsed hyphens within each part; this pass covers the joins.
    slugify(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(slug: &str) {
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'), "{slug}");
        assert!(!slug.starts_with('-') && !slug.ends_with('-'), "{slug}");
        assert!(!slug.contains("--"), "{slug}");
    }

    #[test]
    fn mixes_pinyin_and_ascii() {
        assert_eq!(generate_slug("你好 World"), "ni-hao-world");
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(generate_slug("你好 World"), generate_slug("你好 World"));
    }

    #[test]
    fn adjacent_segments_are_hyphenated() {
        assert_eq!(generate_slug("Rust入门2024"), "rust-ru-men-2024");
    }

    #[test]
    fn strips_punctuation_and_collapses_separators() {
        let slug = generate_slug("  Hello,  --  World!!  ");
        assert_eq!(slug, "hello-world");
        assert_well_formed(&slug);
    }

    #[test]
    fn output_is_always_well_formed() {
        for title in ["基线对齐", "C++ & Rust: 对比", "---", "", "日本語テキスト", "Émile 的 blog"] {
            assert_well_formed(&generate_slug(title));
        }
    }
}
