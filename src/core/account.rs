use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an account in the clearing ledger.
///
/// An account can represent a trading book, a counterparty, a treasury
/// desk, or any entity whose net position the engine tracks.
///
/// # Examples
///
/// ```
/// use ledger_engine::core::account::AccountId;
///
/// let alpha = AccountId::new("ACC-ALPHA");
/// let beta = AccountId::new("ACC-BETA");
/// assert_ne!(alpha, beta);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this account ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
