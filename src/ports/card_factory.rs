use std::borrow::Cow;

use crate::domain::{Card, Owner};

/// Construction capability for owners and cards
///
/// The registry never builds owners or cards directly and goes through this port instead.
#[mockall::automock]
pub trait CardFactoryPort {
    fn make_owner(&self, email: &str, name: &str) -> Result<Owner, Error>;
    fn make_card(&self, owner: Owner) -> Result<Card, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required identity fields are missing or empty
    #[error("invalid argument: {0}")]
    InvalidArgument(Cow<'static, str>),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as a remote card issuer being unavailable.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
