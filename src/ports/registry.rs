use crate::domain::{self, Card};

/// Storage of the email to card mapping
///
/// Implementations must apply every mutation atomically: a failed call leaves the stored cards
/// untouched.
#[mockall::automock]
#[async_trait::async_trait]
pub trait RegistryPort {
    /// Store a new card, keyed by the email of its owner
    async fn insert_card(&self, card: Card) -> Result<Card, Error>;
    /// Remove the card registered for `email` and return it
    async fn remove_card(&self, email: &str) -> Result<Card, Error>;
    async fn get_card(&self, email: &str) -> Result<Card, Error>;
    /// Add points to the card registered for `email`
    async fn add_points(&self, email: &str, points: i32) -> Result<Card, Error>;
    /// Deduct points from the card registered for `email`
    async fn use_points(&self, email: &str, points: i32) -> Result<Card, Error>;
    /// All registered cards, in registration order
    async fn list_cards(&self) -> Result<Vec<Card>, Error>;
    /// Number of registered cards
    async fn count_cards(&self) -> Result<usize, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("owner {0} is already registered")]
    AlreadyRegistered(String),

    #[error("owner {0} is not registered")]
    NotRegistered(String),

    /// The card rejected the operation
    #[error("card error: {0}")]
    Domain(#[from] domain::Error),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
