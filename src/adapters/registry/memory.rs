use crate::{
    domain::Card,
    ports::registry::{Error, RegistryPort},
};
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, Mutex, PoisonError},
};

#[derive(Clone, Debug, Default)]
pub struct MemoryRegistry {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    cards: HashMap<String, Registration>,
    /// Sequence number handed to the next registration
    next_sequence: u64,
}

#[derive(Debug)]
struct Registration {
    sequence: u64,
    card: Card,
}

impl Inner {
    fn card(&self, email: &str) -> Result<&Card, Error> {
        self.cards
            .get(email)
            .map(|registration| &registration.card)
            .ok_or_else(|| Error::NotRegistered(email.to_string()))
    }

    fn card_mut(&mut self, email: &str) -> Result<&mut Card, Error> {
        self.cards
            .get_mut(email)
            .map(|registration| &mut registration.card)
            .ok_or_else(|| Error::NotRegistered(email.to_string()))
    }
}

#[async_trait::async_trait]
impl RegistryPort for MemoryRegistry {
    async fn insert_card(&self, card: Card) -> Result<Card, Error> {
        let mut inner = self.inner.lock()?;
        let sequence = inner.next_sequence;

        match inner.cards.entry(card.owner().email().to_string()) {
            // Email already registered
            Entry::Occupied(entry) => return Err(Error::AlreadyRegistered(entry.key().clone())),
            // New registration
            Entry::Vacant(entry) => {
                entry.insert(Registration {
                    sequence,
                    card: card.clone(),
                });
            }
        }
        inner.next_sequence += 1;

        Ok(card)
    }

    async fn remove_card(&self, email: &str) -> Result<Card, Error> {
        self.inner
            .lock()?
            .cards
            .remove(email)
            .map(|registration| registration.card)
            .ok_or_else(|| Error::NotRegistered(email.to_string()))
    }

    async fn get_card(&self, email: &str) -> Result<Card, Error> {
        let card = self.inner.lock()?.card(email)?.clone();

        Ok(card)
    }

    async fn add_points(&self, email: &str, points: i32) -> Result<Card, Error> {
        let mut inner = self.inner.lock()?;
        let card = inner.card_mut(email)?;
        card.add_points(points);

        Ok(card.clone())
    }

    async fn use_points(&self, email: &str, points: i32) -> Result<Card, Error> {
        let mut inner = self.inner.lock()?;
        let card = inner.card_mut(email)?;
        // The card leaves its state untouched when it rejects the deduction
        card.use_points(points)?;

        Ok(card.clone())
    }

    async fn list_cards(&self) -> Result<Vec<Card>, Error> {
        let inner = self.inner.lock()?;
        let mut registrations: Vec<_> = inner.cards.values().collect();
        registrations.sort_by_key(|registration| registration.sequence);

        Ok(registrations
            .into_iter()
            .map(|registration| registration.card.clone())
            .collect())
    }

    async fn count_cards(&self) -> Result<usize, Error> {
        Ok(self.inner.lock()?.cards.len())
    }
}

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}
