use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Currency;

/// Stable identifier of a group member.
///
/// The engine operates on ids only; display names and avatars stay with the
/// caller's profile lookup. The ordering is total (byte order of the
/// underlying UUID) because settlement ordering breaks ties on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Uuid);

impl MemberId {
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for MemberId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A set of members splitting shared costs in a single settlement currency.
///
/// A group has at least one member (enforced when a settlement is computed)
/// and its currency is fixed for its lifetime; there is no mixed-currency
/// ledger. Membership itself is passed per call: the caller owns membership
/// storage and the engine recomputes from a full snapshot every time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub currency: Currency,
}

impl Group {
    #[must_use]
    pub fn new(id: String, currency: Currency) -> Self {
        Self { id, currency }
    }
}
