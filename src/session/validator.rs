//! Session validity
//!
//! The default policy only asks whether a token is stored at all. The expiry
//! policy also rejects sessions older than a configured age, measured against
//! an injectable clock.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

use super::Session;
use crate::config::{SessionConfig, ValidatorKind};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Decides whether a stored session still authenticates
pub trait SessionValidator: Send + Sync {
    fn is_valid(&self, session: &Session, now: DateTime<Utc>) -> bool;
}

/// Any non-empty token is valid
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceValidator;

impl SessionValidator for PresenceValidator {
    fn is_valid(&self, session: &Session, _now: DateTime<Utc>) -> bool {
        !session.token.trim().is_empty()
    }
}

/// Non-empty token issued less than `max_age` ago
///
/// Sessions without an issue time are treated as expired.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryValidator {
    max_age: Duration,
}

impl ExpiryValidator {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }
}

impl SessionValidator for ExpiryValidator {
    fn is_valid(&self, session: &Session, now: DateTime<Utc>) -> bool {
        if !PresenceValidator.is_valid(session, now) {
            return false;
        }
        match session.issued_at {
            Some(issued) => now - issued < self.max_age,
            None => false,
        }
    }
}

/// Build the validator selected in configuration
pub fn validator_from_config(config: &SessionConfig) -> Arc<dyn SessionValidator> {
    match config.validator {
        ValidatorKind::Presence => Arc::new(PresenceValidator),
        ValidatorKind::Expiry => {
            let secs = i64::try_from(config.max_age_secs).unwrap_or(i64::MAX);
            Arc::new(ExpiryValidator::new(Duration::seconds(secs)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdminIdentity;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_presence_accepts_any_token() {
        let session = Session::new("abc", AdminIdentity::default(), start());
        let years_later = start() + Duration::days(3650);
        assert!(PresenceValidator.is_valid(&session, years_later));

        let blank = Session::new("  ", AdminIdentity::default(), start());
        assert!(!PresenceValidator.is_valid(&blank, start()));
    }

    #[test]
    fn test_expiry_with_manual_clock() {
        let clock = ManualClock::new(start());
        let validator = ExpiryValidator::new(Duration::hours(1));
        let session = Session::new("abc", AdminIdentity::default(), clock.now());

        assert!(validator.is_valid(&session, clock.now()));
        clock.advance(Duration::minutes(59));
        assert!(validator.is_valid(&session, clock.now()));
        clock.advance(Duration::minutes(1));
        assert!(!validator.is_valid(&session, clock.now()));
    }

    #[test]
    fn test_expiry_rejects_sessions_without_issue_time() {
        let session = Session {
            token: "abc".into(),
            admin: AdminIdentity::default(),
            issued_at: None,
        };
        assert!(!ExpiryValidator::new(Duration::days(1)).is_valid(&session, start()));
    }

    #[test]
    fn test_validator_from_config() {
        let mut config = SessionConfig {
            validator: ValidatorKind::Expiry,
            max_age_secs: 60,
            ..SessionConfig::default()
        };
        let session = Session::new("abc", AdminIdentity::default(), start());
        let validator = validator_from_config(&config);
        assert!(!validator.is_valid(&session, start() + Duration::seconds(61)));

        config.validator = ValidatorKind::Presence;
        let validator = validator_from_config(&config);
        assert!(validator.is_valid(&session, start() + Duration::seconds(61)));
    }
}
