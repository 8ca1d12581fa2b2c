use std::{
    future::Future,
    num::NonZeroU32,
    pin::Pin,
    task::{Context, Poll},
};

use crate::ports::{card_factory::CardFactoryPort, registry::RegistryPort};
use tower::Service;
use tracing::info;

use super::{DomainLogic, Error};

/// Purchase paid with money, earning points on the owner's card
pub struct MoneyPurchaseRequest {
    pub email: String,
    /// Price of the purchase in pence
    pub pence: i32,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MoneyPurchaseResponse {
    pub email: String,
    /// Points added to the card by this purchase
    pub points_earned: u32,
    /// Number of loyalty points after the purchase
    pub balance: u32,
    pub usage_count: u32,
}

impl<F, R> Service<MoneyPurchaseRequest> for DomainLogic<F, R>
where
    F: CardFactoryPort + 'static,
    R: RegistryPort + 'static,
{
    type Response = MoneyPurchaseResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: MoneyPurchaseRequest) -> Self::Future {
        let registry = self.registry.clone();
        let pence_per_point = self.config.pence_per_point;
        Box::pin(async move {
            // Non-positive amounts still require a registered email, the card ignores them
            let points = points_for(req.pence, pence_per_point);
            let card = registry.add_points(&req.email, points).await?;

            info!(
                email = %req.email,
                pence = req.pence,
                points,
                balance = card.balance(),
                "money purchase processed"
            );
            Ok(MoneyPurchaseResponse {
                email: req.email,
                points_earned: points.max(0).unsigned_abs(),
                balance: card.balance(),
                usage_count: card.usage_count(),
            })
        })
    }
}

/// Points earned for a price, truncated toward zero
fn points_for(pence: i32, pence_per_point: NonZeroU32) -> i32 {
    // |pence / rate| <= |pence|, so the quotient always fits back into an `i32`
    (i64::from(pence) / i64::from(pence_per_point.get())) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::{factory::StandardFactory, registry::memory::MemoryRegistry},
        commands::{register_owner::RegisterOwnerRequest, reports::TotalPointsRequest, ErrorKind},
        config::RegistryConfig,
        domain::{Card, Owner},
        ports::{card_factory::MockCardFactoryPort, registry::MockRegistryPort},
    };
    use mockall::predicate::*;
    use rstest::*;
    use speculoos::prelude::*;
    use std::sync::Arc;
    use tower::BoxError;

    fn rate(pence_per_point: u32) -> NonZeroU32 {
        NonZeroU32::new(pence_per_point).unwrap()
    }

    #[rstest]
    #[case(1250, 100, 12)]
    #[case(1200, 100, 12)]
    #[case(99, 100, 0)]
    #[case(0, 100, 0)]
    #[case(-150, 100, -1)]
    #[case(1250, 1, 1250)]
    #[case(1250, 500, 2)]
    #[case(i32::MAX, 1, i32::MAX)]
    #[case(i32::MIN, 1, i32::MIN)]
    fn test_points_for(#[case] pence: i32, #[case] pence_per_point: u32, #[case] expected: i32) {
        assert_that!(points_for(pence, rate(pence_per_point))).is_equal_to(expected);
    }

    #[fixture]
    fn domain() -> DomainLogic<StandardFactory, MemoryRegistry> {
        DomainLogic::new(
            Arc::new(StandardFactory),
            Arc::new(MemoryRegistry::default()),
            RegistryConfig::default(),
        )
    }

    #[fixture]
    fn owner() -> Owner {
        Owner::new("name@name.com", "Name").unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn test_purchase_truncates(
        mut domain: DomainLogic<StandardFactory, MemoryRegistry>,
        owner: Owner,
    ) -> Result<(), BoxError> {
        domain.execute(RegisterOwnerRequest { owner }).await?;

        let res = domain
            .execute(MoneyPurchaseRequest {
                email: "name@name.com".to_string(),
                pence: 1250,
            })
            .await;

        assert_that!(res).is_ok().is_equal_to(MoneyPurchaseResponse {
            email: "name@name.com".to_string(),
            points_earned: 12,
            balance: 12,
            usage_count: 1,
        });

        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn test_purchase_below_one_point(
        mut domain: DomainLogic<StandardFactory, MemoryRegistry>,
        owner: Owner,
        #[values(-500, 0, 99)] pence: i32,
    ) -> Result<(), BoxError> {
        domain.execute(RegisterOwnerRequest { owner }).await?;

        let res = domain
            .execute(MoneyPurchaseRequest {
                email: "name@name.com".to_string(),
                pence,
            })
            .await;

        // No points and no use recorded
        assert_that!(res).is_ok().is_equal_to(MoneyPurchaseResponse {
            email: "name@name.com".to_string(),
            points_earned: 0,
            balance: 0,
            usage_count: 0,
        });

        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn test_purchase_not_registered(
        mut domain: DomainLogic<StandardFactory, MemoryRegistry>,
        #[values(0, 1250)] pence: i32,
    ) -> Result<(), BoxError> {
        let res = domain
            .execute(MoneyPurchaseRequest {
                email: "missing@example.com".to_string(),
                pence,
            })
            .await;

        assert_that!(res)
            .is_err()
            .matches(|err| err.kind() == ErrorKind::NotRegistered);
        let total = domain.execute(TotalPointsRequest).await?;
        assert_that!(total).is_equal_to(0);

        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn test_call_uses_configured_rate(owner: Owner) -> Result<(), BoxError> {
        // GIVEN
        // * a registry port expecting 5 points for a 1250 pence purchase at 250 pence per point
        // * a factory port that is never used
        let mut registry = MockRegistryPort::new();
        let card_owner = owner.clone();
        registry
            .expect_add_points()
            .times(1)
            .with(always(), eq(5))
            .returning(move |_, points| {
                let mut card = Card::new(card_owner.clone());
                card.add_points(points);
                Ok(card)
            });

        let mut domain = DomainLogic::new(
            Arc::new(MockCardFactoryPort::new()),
            Arc::new(registry),
            RegistryConfig {
                pence_per_point: rate(250),
            },
        );

        // WHEN calling the service
        let res = domain
            .execute(MoneyPurchaseRequest {
                email: owner.email().to_string(),
                pence: 1250,
            })
            .await;

        // THEN
        // * It returns a valid response
        // * The registry port is called
        assert_that!(res).is_ok().is_equal_to(MoneyPurchaseResponse {
            email: "name@name.com".to_string(),
            points_earned: 5,
            balance: 5,
            usage_count: 1,
        });
        Arc::into_inner(domain.registry).unwrap().checkpoint();

        Ok(())
    }
}
