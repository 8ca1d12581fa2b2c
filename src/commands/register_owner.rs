use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::Owner,
    ports::{
        card_factory::CardFactoryPort,
        registry::{self, RegistryPort},
    },
};
use chrono::{DateTime, Utc};
use tower::Service;
use tracing::{debug, info};
use uuid::Uuid;

use super::{DomainLogic, Error};

pub struct RegisterOwnerRequest {
    pub owner: Owner,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RegisterOwnerResponse {
    pub email: String,
    /// Identifier of the card issued to the owner
    pub card_id: Uuid,
    pub issued_at: DateTime<Utc>,
}

impl<F, R> Service<RegisterOwnerRequest> for DomainLogic<F, R>
where
    F: CardFactoryPort + 'static,
    R: RegistryPort + 'static,
{
    type Response = RegisterOwnerResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RegisterOwnerRequest) -> Self::Future {
        let factory = self.factory.clone();
        let registry = self.registry.clone();
        Box::pin(async move {
            let email = req.owner.email().to_string();

            // Duplicates are rejected before a card is issued
            match registry.get_card(&email).await {
                Ok(_) => {
                    debug!(%email, "owner already registered");
                    return Err(registry::Error::AlreadyRegistered(email).into());
                }
                Err(registry::Error::NotRegistered(_)) => {}
                Err(err) => return Err(err.into()),
            }

            // Issue a new card and store it under the owner's email
            let card = factory.make_card(req.owner)?;
            let card = registry.insert_card(card).await.map_err(|err| {
                debug!(%email, error = %err, "registration rejected");
                err
            })?;

            info!(%email, card_id = %card.card_id(), "owner registered");
            Ok(RegisterOwnerResponse {
                email,
                card_id: card.card_id(),
                issued_at: card.issued_at(),
            })
        })
    }
}
