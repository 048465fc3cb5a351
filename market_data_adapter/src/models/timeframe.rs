use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimeFrameError {
    #[error("Invalid amount for {:?}: {}", unit, message)]
    InvalidAmount {
        unit: TimeFrameUnit,
        message: String,
    },

    #[error("Invalid input: {}", message)]
    InvalidInput { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFrameUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl TimeFrameUnit {
    fn suffix(self) -> &'static str {
        match self {
            TimeFrameUnit::Minute => "m",
            TimeFrameUnit::Hour => "h",
            TimeFrameUnit::Day => "d",
            TimeFrameUnit::Week => "wk",
            TimeFrameUnit::Month => "mo",
        }
    }
}

/// Width of one bar, written on the wire as `<amount><unit>` (`5m`, `1wk`, `3mo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFrame {
    pub amount: u32,
    pub unit: TimeFrameUnit,
}

impl TimeFrame {
    pub fn new(amount: u32, unit: TimeFrameUnit) -> Result<Self, TimeFrameError> {
        if amount == 0 {
            return Err(TimeFrameError::InvalidAmount {
                unit,
                message: "amount must be at least 1".into(),
            });
        }
        Ok(Self { amount, unit })
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for TimeFrame {
    type Err = TimeFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .filter(|&i| i > 0)
            .ok_or_else(|| TimeFrameError::InvalidInput {
                message: format!("expected <amount><unit>, got {s:?}"),
            })?;
        let (digits, suffix) = s.split_at(split);

        let amount = digits.parse::<u32>().map_err(|e| TimeFrameError::InvalidInput {
            message: format!("bad amount {digits:?}: {e}"),
        })?;
        let unit = match suffix {
            "m" => TimeFrameUnit::Minute,
            "h" => TimeFrameUnit::Hour,
            "d" => TimeFrameUnit::Day,
            "wk" => TimeFrameUnit::Week,
            "mo" => TimeFrameUnit::Month,
            _ => {
                return Err(TimeFrameError::InvalidInput {
                    message: format!("unknown unit {suffix:?}"),
                });
            }
        };

        Self::new(amount, unit)
    }
}
