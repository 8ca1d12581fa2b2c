use std::sync::Arc;

use tower::{Service, ServiceExt};

use crate::{
    config::RegistryConfig,
    domain::{self, Owner},
    ports::{
        card_factory::{self, CardFactoryPort},
        registry,
    },
};

pub mod money_purchase;
pub mod points_purchase;
pub mod register_owner;
pub mod reports;
pub mod unregister_owner;

/// Registry operations
///
/// Every operation is exposed as a [`tower::Service`] over its own request type.
pub struct DomainLogic<F, R> {
    factory: Arc<F>,
    registry: Arc<R>,
    config: RegistryConfig,
}

impl<F, R> DomainLogic<F, R> {
    pub fn new(factory: Arc<F>, registry: Arc<R>, config: RegistryConfig) -> Self {
        Self {
            factory,
            registry,
            config,
        }
    }

    /// Wait for the service matching `Req` to be ready, then call it
    pub async fn execute<Req>(
        &mut self,
        req: Req,
    ) -> Result<<Self as Service<Req>>::Response, Error>
    where
        Self: Service<Req, Error = Error>,
    {
        let service = ServiceExt::<Req>::ready(self).await?;
        Service::<Req>::call(service, req).await
    }
}

impl<F, R> DomainLogic<F, R>
where
    F: CardFactoryPort,
{
    /// Build an owner through the injected factory
    pub fn make_owner(&self, email: &str, name: &str) -> Result<Owner, Error> {
        Ok(self.factory.make_owner(email, name)?)
    }
}

impl<F, R> Clone for DomainLogic<F, R> {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
            registry: self.registry.clone(),
            config: self.config,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("registry port error: {0}")]
    Registry(#[from] registry::Error),
    #[error("card factory port error: {0}")]
    Factory(#[from] card_factory::Error),

    /// A query needed at least one registered owner
    #[error("no owners are registered")]
    NoOwnersRegistered,
}

/// Kinds of failure reported to callers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or empty identity fields
    InvalidArgument,
    /// The email is already registered
    AlreadyRegistered,
    /// The email is not registered, or no owner is registered at all
    NotRegistered,
    /// The card does not hold enough points
    InsufficientPoints,
    /// Failure of a concrete adapter
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Registry(registry::Error::AlreadyRegistered(_)) => ErrorKind::AlreadyRegistered,
            Error::Registry(registry::Error::NotRegistered(_)) | Error::NoOwnersRegistered => {
                ErrorKind::NotRegistered
            }
            Error::Registry(registry::Error::Domain(domain::Error::InsufficientPoints {
                ..
            })) => ErrorKind::InsufficientPoints,
            // `MemoryRegistry` never yields this one, stores that validate owners on insert may
            Error::Registry(registry::Error::Domain(domain::Error::InvalidArgument(_)))
            | Error::Factory(card_factory::Error::InvalidArgument(_)) => ErrorKind::InvalidArgument,
            Error::Registry(registry::Error::Adapter(_))
            | Error::Factory(card_factory::Error::Adapter(_)) => ErrorKind::Internal,
        }
    }
}
