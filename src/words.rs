//! Word counting shared by quota evaluation and report rendering.
//!
//! Both sides of the engine size a submission the same way: the quota gate
//! charges accounts by word count and the report header echoes it back, so
//! the definition lives in one place.

/// Count whitespace-delimited words in `text`.
///
/// Any run of Unicode whitespace separates two words. Blank or
/// whitespace-only input counts as zero.
pub fn count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// True when `text` contains no words at all.
pub fn is_blank(text: &str) -> bool {
    count(text) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_simple() {
        assert_eq!(count("one two three"), 3);
    }

    #[test]
    fn test_count_collapses_whitespace_runs() {
        assert_eq!(count("  one\t\ttwo \n three  "), 3);
        assert_eq!(count("one\r\ntwo"), 2);
    }

    #[test]
    fn test_count_blank_is_zero() {
        assert_eq!(count(""), 0);
        assert_eq!(count("   \n\t  "), 0);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \r\n "));
        assert!(!is_blank("word"));
    }

    #[test]
    fn test_punctuation_sticks_to_words() {
        assert_eq!(count("Hello, world!"), 2);
        assert_eq!(count("a-b c.d"), 2);
    }
}
