use std::time::Duration;

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Shortest interval accepted from settings
const MIN_TICK_MS: u64 = 100;

/// Get tick duration for a configured interval
pub fn tick_duration(tick_ms: u64) -> Duration {
    Duration::from_millis(tick_ms.max(MIN_TICK_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(DEFAULT_TICK_MS), Duration::from_secs(1));
        assert_eq!(tick_duration(250), Duration::from_millis(250));
    }

    #[test]
    fn test_tick_duration_has_floor() {
        assert_eq!(tick_duration(0), Duration::from_millis(MIN_TICK_MS));
    }
}
