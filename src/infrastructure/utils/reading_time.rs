use crate::utils::markdown::strip_markdown;

/// Reading speed tuned for CJK prose, where characters rather than words are counted.
pub const CHARS_PER_MINUTE: usize = 400;

/// Number of characters kept when an article body is shown as a preview.
pub const PREVIEW_LENGTH: usize = 500;

const PREVIEW_ELLIPSIS: &str = "...";

/// Estimated whole minutes needed to read `content`, rounded up.
///
/// Whitespace is not counted, so empty or blank input yields 0; callers
/// render anything below 1 as "< 1 minute".
pub fn estimate_reading_time(content: &str) -> u32 {
    let chars = strip_markdown(content)
        .chars()
        .filter(|c| !c.is_whitespace())
        .count();

    chars.div_ceil(CHARS_PER_MINUTE) as u32
}

/// First [`PREVIEW_LENGTH`] characters of `content`, with an ellipsis when cut.
pub fn truncate_preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_LENGTH) {
        Some((byte_index, _)) => format!("{}{}", &content[..byte_index], PREVIEW_ELLIPSIS),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_content_take_zero_minutes() {
        assert_eq!(estimate_reading_time(""), 0);
        assert_eq!(estimate_reading_time("   \n\t "), 0);
    }

    #[test]
    fn rounds_partial_minutes_up() {
        assert_eq!(estimate_reading_time("字"), 1);
        assert_eq!(estimate_reading_time(&"字".repeat(400)), 1);
        assert_eq!(estimate_reading_time(&"字".repeat(401)), 2);
    }

    #[test]
    fn markup_does_not_count_towards_reading_time() {
        let marked = format!("# {}", "*a*".repeat(400));
        assert_eq!(estimate_reading_time(&marked), 1);
    }

    #[test]
    fn is_monotonic_in_stripped_length() {
        let mut previous = 0;
        for len in (0..2000).step_by(37) {
            let minutes = estimate_reading_time(&"x".repeat(len));
            assert!(minutes >= previous);
            previous = minutes;
        }
    }

    #[test]
    fn short_content_is_not_truncated() {
        let content = "字".repeat(PREVIEW_LENGTH);
        assert_eq!(truncate_preview(&content), content);
    }

    #[test]
    fn long_content_is_cut_on_char_boundary() {
        let content = "字".repeat(PREVIEW_LENGTH + 1);
        let preview = truncate_preview(&content);

        assert!(preview.ends_with("..."));
        assert_eq!(preview.trim_end_matches('.').chars().count(), PREVIEW_LENGTH);
    }
}
