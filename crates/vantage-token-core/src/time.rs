//! Time configuration for token validity windows.

/// Validity window for a minted token.
///
/// `start_time` of `None` means "now" at issue time. The default duration is
/// 300 seconds: a reveal capability lives for five minutes, deliberately much
/// shorter than the primary session credential it was exchanged under. The
/// short lifetime is the sole mitigation against token leakage; this token
/// class has no revocation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTimeConfig {
    /// Unix timestamp the validity window opens at (None = issue time)
    pub start_time: Option<i64>,
    /// Validity duration in seconds
    pub duration: i64,
}

impl Default for TokenTimeConfig {
    fn default() -> Self {
        Self {
            start_time: None,
            duration: 300,
        }
    }
}

impl TokenTimeConfig {
    /// A config starting now with a custom duration in seconds.
    pub fn with_duration(duration: i64) -> Self {
        Self {
            start_time: None,
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_five_minutes() {
        let config = TokenTimeConfig::default();
        assert_eq!(config.duration, 300);
        assert!(config.start_time.is_none());
    }

    #[test]
    fn test_with_duration() {
        let config = TokenTimeConfig::with_duration(60);
        assert_eq!(config.duration, 60);
        assert!(config.start_time.is_none());
    }
}
