//! Suggestion service abstraction.
//!
//! The service answers `suggest/<kind>` and `findById/<kind>` queries with the
//! same `{"suggestions": [...]}` shape for every kind. [`DaData`] issues those
//! queries; [`Suggest`] is the typed address surface callers depend on.

mod client;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::address::AddressRecord;

pub use client::DaData;

/// Number of suggestions requested when the caller does not say otherwise.
pub const DEFAULT_COUNT: u32 = 10;

/// Entity kinds the suggestion endpoints understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestKind {
    Address,
    Party,
    Bank,
    Fio,
    Email,
}

impl SuggestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestKind::Address => "address",
            SuggestKind::Party => "party",
            SuggestKind::Bank => "bank",
            SuggestKind::Fio => "fio",
            SuggestKind::Email => "email",
        }
    }
}

impl fmt::Display for SuggestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "address" => Ok(SuggestKind::Address),
            "party" => Ok(SuggestKind::Party),
            "bank" => Ok(SuggestKind::Bank),
            "fio" => Ok(SuggestKind::Fio),
            "email" => Ok(SuggestKind::Email),
            _ => anyhow::bail!(
                "Unknown suggestion kind '{}'. Expected one of: address, party, bank, fio, email.",
                s
            ),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Suggest: Send + Sync {
    /// Address suggestions for a partial address, in provider order.
    /// An empty or unexpected response yields an empty list.
    async fn suggest_address(&self, query: &str, count: u32) -> Result<Vec<AddressRecord>>;

    /// Address for a KLADR or FIAS code, if the service knows it.
    async fn find_address_by_id(&self, code: &str) -> Result<Option<AddressRecord>>;
}
