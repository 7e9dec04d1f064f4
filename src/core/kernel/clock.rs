use chrono::{DateTime, Utc};

/// Wall-clock source for request timestamps.
///
/// The exchange rejects signatures whose timestamp drifts outside its skew
/// window, so a timestamp must be taken for every signed attempt.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// ISO-8601 UTC with millisecond precision and a literal `Z`,
    /// e.g. `2024-01-01T00:00:00.000Z`
    fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant, for deterministic signatures in tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_formats_with_millis_and_zulu() {
        let clock = FixedClock::from_millis(1_704_067_200_000).unwrap();
        assert_eq!(clock.timestamp(), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_sub_second_precision_is_kept() {
        let clock = FixedClock::from_millis(1_704_067_200_123).unwrap();
        assert_eq!(clock.timestamp(), "2024-01-01T00:00:00.123Z");
    }

    #[test]
    fn test_system_clock_shape() {
        let ts = SystemClock.timestamp();
        assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[19..20], ".");
    }
}
