//! Index and period models

use std::fmt;
use std::str::FromStr;

/// A tracked market index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexName {
    Nifty,
    BankNifty,
}

impl IndexName {
    /// Every index the bot knows how to fetch, in display order
    pub const ALL: [IndexName; 2] = [IndexName::Nifty, IndexName::BankNifty];

    /// Yahoo Finance symbol for this index
    pub fn yahoo_symbol(&self) -> &'static str {
        match self {
            IndexName::Nifty => "^NSEI",
            IndexName::BankNifty => "^NSEBANK",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexName::Nifty => "NIFTY",
            IndexName::BankNifty => "BANKNIFTY",
        }
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NIFTY" | "NIFTY50" | "NSEI" => Ok(IndexName::Nifty),
            "BANKNIFTY" | "BANK_NIFTY" | "NIFTYBANK" | "NSEBANK" => Ok(IndexName::BankNifty),
            _ => Err(format!("Unknown index: '{}'. Supported: NIFTY, BANKNIFTY", s)),
        }
    }
}

/// Lookback window offered to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    Days30,
    #[default]
    Days90,
    Days180,
    Days365,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Days30, Period::Days90, Period::Days180, Period::Days365];

    pub fn days(&self) -> usize {
        match self {
            Period::Days30 => 30,
            Period::Days90 => 90,
            Period::Days180 => 180,
            Period::Days365 => 365,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.days())
    }
}

/// Accepts "90" or "90d"
impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let number = lowered.strip_suffix('d').unwrap_or(&lowered);
        match number {
            "30" => Ok(Period::Days30),
            "90" => Ok(Period::Days90),
            "180" => Ok(Period::Days180),
            "365" => Ok(Period::Days365),
            _ => Err(format!("Unknown period: '{}'. Supported: 30, 90, 180, 365", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_parsing_is_case_insensitive() {
        assert_eq!("nifty".parse::<IndexName>().unwrap(), IndexName::Nifty);
        assert_eq!("BankNifty".parse::<IndexName>().unwrap(), IndexName::BankNifty);
        assert_eq!("bank_nifty".parse::<IndexName>().unwrap(), IndexName::BankNifty);
        assert!("sensex".parse::<IndexName>().is_err());
    }

    #[test]
    fn test_yahoo_symbols() {
        assert_eq!(IndexName::Nifty.yahoo_symbol(), "^NSEI");
        assert_eq!(IndexName::BankNifty.yahoo_symbol(), "^NSEBANK");
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("30".parse::<Period>().unwrap(), Period::Days30);
        assert_eq!("365d".parse::<Period>().unwrap(), Period::Days365);
        assert_eq!("180D".parse::<Period>().unwrap(), Period::Days180);
        assert!("60".parse::<Period>().is_err());
        assert!("d".parse::<Period>().is_err());
        assert_eq!(Period::default().days(), 90);
        assert_eq!(Period::Days90.to_string(), "90d");
    }
}
