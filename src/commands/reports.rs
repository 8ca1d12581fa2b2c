//! Read-only queries over the registered cards

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{Card, Owner},
    ports::{card_factory::CardFactoryPort, registry::RegistryPort},
};
use tower::Service;

use super::{DomainLogic, Error};

type ReportFuture<T> = Pin<Box<dyn Future<Output = Result<T, Error>>>>;

/// Number of registered owners
pub struct CustomerCountRequest;

/// Sum of the points held on every registered card
pub struct TotalPointsRequest;

/// Points held on the card of one owner
pub struct PointsOfRequest {
    pub email: String,
}

/// Number of uses of the card of one owner
pub struct UsesOfRequest {
    pub email: String,
}

/// Owner whose card has been used the most
///
/// Ties go to the owner registered first. Resolves to `None` when no registered card has been
/// used yet, and fails when no owner is registered at all.
pub struct MostUsedRequest;

impl<F, R> Service<CustomerCountRequest> for DomainLogic<F, R>
where
    F: CardFactoryPort + 'static,
    R: RegistryPort + 'static,
{
    type Response = usize;
    type Error = Error;
    type Future = ReportFuture<usize>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: CustomerCountRequest) -> Self::Future {
        let registry = self.registry.clone();
        Box::pin(async move { Ok(registry.count_cards().await?) })
    }
}

impl<F, R> Service<TotalPointsRequest> for DomainLogic<F, R>
where
    F: CardFactoryPort + 'static,
    R: RegistryPort + 'static,
{
    type Response = u64;
    type Error = Error;
    type Future = ReportFuture<u64>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: TotalPointsRequest) -> Self::Future {
        let registry = self.registry.clone();
        Box::pin(async move {
            let cards = registry.list_cards().await?;

            Ok(cards.iter().map(|card| u64::from(card.balance())).sum())
        })
    }
}

impl<F, R> Service<PointsOfRequest> for DomainLogic<F, R>
where
    F: CardFactoryPort + 'static,
    R: RegistryPort + 'static,
{
    type Response = u32;
    type Error = Error;
    type Future = ReportFuture<u32>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: PointsOfRequest) -> Self::Future {
        let registry = self.registry.clone();
        Box::pin(async move { Ok(registry.get_card(&req.email).await?.balance()) })
    }
}

impl<F, R> Service<UsesOfRequest> for DomainLogic<F, R>
where
    F: CardFactoryPort + 'static,
    R: RegistryPort + 'static,
{
    type Response = u32;
    type Error = Error;
    type Future = ReportFuture<u32>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: UsesOfRequest) -> Self::Future {
        let registry = self.registry.clone();
        Box::pin(async move { Ok(registry.get_card(&req.email).await?.usage_count()) })
    }
}

impl<F, R> Service<MostUsedRequest> for DomainLogic<F, R>
where
    F: CardFactoryPort + 'static,
    R: RegistryPort + 'static,
{
    type Response = Option<Owner>;
    type Error = Error;
    type Future = ReportFuture<Option<Owner>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: MostUsedRequest) -> Self::Future {
        let registry = self.registry.clone();
        Box::pin(async move {
            let cards = registry.list_cards().await?;
            if cards.is_empty() {
                return Err(Error::NoOwnersRegistered);
            }

            Ok(most_used(&cards).map(|card| card.owner().clone()))
        })
    }
}

/// First card, in registration order, with the strictly highest usage count
///
/// Cards that were never used are never selected.
fn most_used(cards: &[Card]) -> Option<&Card> {
    cards
        .iter()
        .filter(|card| card.usage_count() > 0)
        .fold(None, |best: Option<&Card>, card| match best {
            Some(best) if best.usage_count() >= card.usage_count() => Some(best),
            _ => Some(card),
        })
}
