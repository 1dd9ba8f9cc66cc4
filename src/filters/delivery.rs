//! Delivery-time buckets
//!
//! A bucket token is either `"min-max"` (inclusive on both ends) or `"min"`
//! (open-ended, `min` or more).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Canonical buckets offered to the user, as `(label, token)`.
pub const DELIVERY_TIME_OPTIONS: [(&str, &str); 4] = [
    ("0-10 min", "0-10"),
    ("10-30 min", "10-30"),
    ("30-60 min", "30-60"),
    ("1 hour+", "60"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid delivery time bucket '{0}'")]
pub struct InvalidBucket(pub String);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryBucket {
    pub min: f64,
    pub max: Option<f64>,
}

impl DeliveryBucket {
    pub fn contains(&self, minutes: f64) -> bool {
        minutes >= self.min && self.max.map_or(true, |max| minutes <= max)
    }
}

impl FromStr for DeliveryBucket {
    type Err = InvalidBucket;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidBucket(token.to_string());
        let bound = |s: &str| {
            s.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(invalid)
        };

        let bucket = match token.split_once('-') {
            Some((min, max)) => DeliveryBucket {
                min: bound(min)?,
                max: Some(bound(max)?),
            },
            None => DeliveryBucket {
                min: bound(token)?,
                max: None,
            },
        };

        match bucket.max {
            Some(max) if max < bucket.min => Err(invalid()),
            _ => Ok(bucket),
        }
    }
}

impl fmt::Display for DeliveryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}", self.min),
        }
    }
}

/// True when `minutes` falls in any of the selected bucket tokens.
///
/// Tokens that do not parse match nothing.
pub fn in_any_bucket<S: AsRef<str>>(minutes: f64, tokens: &[S]) -> bool {
    tokens.iter().any(|token| {
        token
            .as_ref()
            .parse::<DeliveryBucket>()
            .map(|bucket| bucket.contains(minutes))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ranges_and_open_ended() {
        let b: DeliveryBucket = "10-30".parse().unwrap();
        assert_eq!(b.min, 10.0);
        assert_eq!(b.max, Some(30.0));

        let b: DeliveryBucket = "60".parse().unwrap();
        assert_eq!(b.max, None);
        assert_eq!(b.to_string(), "60");
    }

    #[test]
    fn bounds_are_inclusive() {
        let b: DeliveryBucket = "10-30".parse().unwrap();
        assert!(b.contains(10.0));
        assert!(b.contains(30.0));
        assert!(!b.contains(9.0));
        assert!(!b.contains(31.0));

        let open: DeliveryBucket = "60".parse().unwrap();
        assert!(open.contains(60.0));
        assert!(open.contains(240.0));
        assert!(!open.contains(59.0));
    }

    #[test]
    fn rejects_garbage() {
        for token in ["", "fast", "10-", "-5", "30-10", "a-b"] {
            assert!(token.parse::<DeliveryBucket>().is_err(), "{token}");
        }
    }

    #[test]
    fn any_bucket_uses_or() {
        let tokens = ["0-10", "60"];
        assert!(in_any_bucket(5.0, &tokens));
        assert!(in_any_bucket(75.0, &tokens));
        assert!(!in_any_bucket(20.0, &tokens));
        assert!(!in_any_bucket(20.0, &["bogus"]));
    }

    #[test]
    fn canonical_options_parse() {
        for (_, token) in DELIVERY_TIME_OPTIONS {
            assert!(token.parse::<DeliveryBucket>().is_ok());
        }
    }
}
