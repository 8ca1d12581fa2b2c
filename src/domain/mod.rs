use std::borrow::Cow;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identity of a loyalty program participant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Owner {
    /// Unique key of the owner within the registry
    email: String,
    name: String,
}

impl Owner {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Result<Self, Error> {
        let email = email.into();
        let name = name.into();

        if email.trim().is_empty() {
            return Err(Error::InvalidArgument("owner email is empty".into()));
        }
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument("owner name is empty".into()));
        }

        Ok(Self { email, name })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Points ledger for a single owner
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    /// Unique identifier for the `Card`
    ///
    /// Registering the same owner again issues a new card with a different identifier.
    card_id: Uuid,
    owner: Owner,
    issued_at: DateTime<Utc>,
    /// Number of points available on the card
    points: u32,
    /// Number of accepted balance-changing operations
    uses: u32,
}

impl Card {
    pub fn new(owner: Owner) -> Self {
        Self {
            card_id: Uuid::new_v4(),
            owner,
            issued_at: Utc::now(),
            points: 0,
            uses: 0,
        }
    }

    pub fn card_id(&self) -> Uuid {
        self.card_id
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn balance(&self) -> u32 {
        self.points
    }

    pub fn usage_count(&self) -> u32 {
        self.uses
    }

    /// Add points to the card
    ///
    /// Non-positive amounts are ignored and do not count as a use.
    pub fn add_points(&mut self, points: i32) {
        if points <= 0 {
            return;
        }

        self.points = self.points.saturating_add(points.unsigned_abs());
        self.uses = self.uses.saturating_add(1);
    }

    /// Deduct points from the card
    ///
    /// Negative amounts are ignored. Deducting zero points is accepted and counts as a use.
    pub fn use_points(&mut self, points: i32) -> Result<(), Error> {
        if points < 0 {
            return Ok(());
        }

        let requested = points.unsigned_abs();
        if requested > self.points {
            return Err(Error::InsufficientPoints {
                balance: self.points,
                requested,
            });
        }

        self.points -= requested;
        self.uses = self.uses.saturating_add(1);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Missing or empty identity field
    #[error("invalid argument: {0}")]
    InvalidArgument(Cow<'static, str>),

    /// Trying to use more points than the card holds
    #[error("insufficient points: requested {requested} with a balance of {balance}")]
    InsufficientPoints { balance: u32, requested: u32 },
}
