//! Derived content metrics

use serde::Serialize;

use crate::config::EditorSettings;

/// Counts derived from the plain-text projection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EditorMetrics {
    pub word_count: usize,
    /// Characters excluding block line breaks
    pub char_count: usize,
    /// Whole minutes, rounded up; 0 for empty content
    pub reading_time_minutes: u32,
    pub limit_exceeded: bool,
}

impl EditorMetrics {
    pub fn compute(plain_text: &str, settings: &EditorSettings) -> Self {
        let word_count = plain_text.split_whitespace().count();
        let char_count = plain_text.chars().filter(|&c| c != '\n').count();

        let wpm = settings.reading_speed_wpm.max(1) as usize;
        let reading_time_minutes = word_count.div_ceil(wpm) as u32;

        let limit_exceeded = settings.max_words.is_some_and(|max| word_count > max)
            || settings.max_chars.is_some_and(|max| char_count > max);

        Self {
            word_count,
            char_count,
            reading_time_minutes,
            limit_exceeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content() {
        let metrics = EditorMetrics::compute("", &EditorSettings::default());
        assert_eq!(metrics, EditorMetrics::default());
    }

    #[test]
    fn test_counts() {
        let metrics = EditorMetrics::compute("Hello there\nworld", &EditorSettings::default());
        assert_eq!(metrics.word_count, 3);
        assert_eq!(metrics.char_count, 16);
        assert_eq!(metrics.reading_time_minutes, 1);
        assert!(!metrics.limit_exceeded);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let settings = EditorSettings {
            reading_speed_wpm: 2,
            ..Default::default()
        };
        let metrics = EditorMetrics::compute("one two three", &settings);
        assert_eq!(metrics.reading_time_minutes, 2);
    }

    #[test]
    fn test_limits() {
        let settings = EditorSettings {
            max_words: Some(2),
            ..Default::default()
        };
        assert!(EditorMetrics::compute("a b c", &settings).limit_exceeded);
        assert!(!EditorMetrics::compute("a b", &settings).limit_exceeded);

        let settings = EditorSettings {
            max_chars: Some(3),
            ..Default::default()
        };
        assert!(EditorMetrics::compute("abcd", &settings).limit_exceeded);
    }
}
