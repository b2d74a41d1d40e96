use chrono::{DateTime, Duration, Utc};

/// Source of wall-clock time for generated artifact ids.
///
/// Services take a `Clock` so tests can pin lesson ids to a known instant.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Milliseconds since the Unix epoch, used to stamp lesson ids.
    #[must_use]
    pub fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// Moves a fixed clock forward. No effect on the system clock.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns the deterministic test instant.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_millis_and_advances() {
        let mut clock = fixed_clock();
        assert_eq!(clock.now_millis(), FIXED_TEST_TIMESTAMP * 1000);

        clock.advance(Duration::milliseconds(250));
        assert_eq!(clock.now_millis(), FIXED_TEST_TIMESTAMP * 1000 + 250);
    }

    #[test]
    fn system_clock_ignores_advance() {
        let mut clock = Clock::default();
        let before = clock.now();
        clock.advance(Duration::days(365));
        assert!(clock.now() - before < Duration::days(1));
    }
}
