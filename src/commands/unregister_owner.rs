use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::Owner,
    ports::{card_factory::CardFactoryPort, registry::RegistryPort},
};
use tower::Service;
use tracing::info;

use super::{DomainLogic, Error};

pub struct UnregisterOwnerRequest {
    pub owner: Owner,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnregisterOwnerResponse {
    pub email: String,
    /// Points left on the card when it was discarded
    pub discarded_points: u32,
}

impl<F, R> Service<UnregisterOwnerRequest> for DomainLogic<F, R>
where
    F: CardFactoryPort + 'static,
    R: RegistryPort + 'static,
{
    type Response = UnregisterOwnerResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: UnregisterOwnerRequest) -> Self::Future {
        let registry = self.registry.clone();
        Box::pin(async move {
            let card = registry.remove_card(req.owner.email()).await?;

            info!(email = %req.owner.email(), card_id = %card.card_id(), "owner unregistered");
            Ok(UnregisterOwnerResponse {
                email: req.owner.email().to_string(),
                discarded_points: card.balance(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::{factory::StandardFactory, registry::memory::MemoryRegistry},
        commands::{
            money_purchase::MoneyPurchaseRequest, register_owner::RegisterOwnerRequest,
            reports::{CustomerCountRequest, PointsOfRequest, UsesOfRequest},
            ErrorKind,
        },
        config::RegistryConfig,
    };
    use rstest::*;
    use speculoos::prelude::*;
    use std::sync::Arc;
    use tower::BoxError;

    #[fixture]
    fn owner() -> Owner {
        Owner::new("name@name.com", "Name").unwrap()
    }

    #[fixture]
    fn domain() -> DomainLogic<StandardFactory, MemoryRegistry> {
        DomainLogic::new(
            Arc::new(StandardFactory),
            Arc::new(MemoryRegistry::default()),
            RegistryConfig::default(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn test_unregister_never_registered(
        mut domain: DomainLogic<StandardFactory, MemoryRegistry>,
        owner: Owner,
    ) {
        let res = domain.execute(UnregisterOwnerRequest { owner }).await;

        assert_that!(res)
            .is_err()
            .matches(|err| err.kind() == ErrorKind::NotRegistered);
    }

    #[rstest]
    #[tokio::test]
    async fn test_unregister(
        mut domain: DomainLogic<StandardFactory, MemoryRegistry>,
        owner: Owner,
    ) -> Result<(), BoxError> {
        domain
            .execute(RegisterOwnerRequest {
                owner: owner.clone(),
            })
            .await?;
        domain
            .execute(MoneyPurchaseRequest {
                email: owner.email().to_string(),
                pence: 950,
            })
            .await?;

        let res = domain
            .execute(UnregisterOwnerRequest {
                owner: owner.clone(),
            })
            .await;

        assert_that!(res).is_ok().is_equal_to(UnregisterOwnerResponse {
            email: "name@name.com".to_string(),
            discarded_points: 9,
        });
        let count = domain.execute(CustomerCountRequest).await?;
        assert_that!(count).is_equal_to(0);

        // A second removal fails
        let res = domain.execute(UnregisterOwnerRequest { owner }).await;
        assert_that!(res)
            .is_err()
            .matches(|err| err.kind() == ErrorKind::NotRegistered);

        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn test_reregister_gets_fresh_card(
        mut domain: DomainLogic<StandardFactory, MemoryRegistry>,
        owner: Owner,
    ) -> Result<(), BoxError> {
        let email = owner.email().to_string();
        let first = domain
            .execute(RegisterOwnerRequest {
                owner: owner.clone(),
            })
            .await?;
        domain
            .execute(MoneyPurchaseRequest {
                email: email.clone(),
                pence: 500,
            })
            .await?;
        domain
            .execute(UnregisterOwnerRequest {
                owner: owner.clone(),
            })
            .await?;

        let second = domain.execute(RegisterOwnerRequest { owner }).await?;

        assert_that!(second.card_id).is_not_equal_to(first.card_id);
        let points = domain
            .execute(PointsOfRequest {
                email: email.clone(),
            })
            .await?;
        assert_that!(points).is_equal_to(0);
        let uses = domain.execute(UsesOfRequest { email }).await?;
        assert_that!(uses).is_equal_to(0);

        Ok(())
    }
}
