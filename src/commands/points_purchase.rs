use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::ports::{card_factory::CardFactoryPort, registry::RegistryPort};
use tower::Service;
use tracing::{debug, info};

use super::{DomainLogic, Error};

/// Purchase paid with points, one point per pence
pub struct PointsPurchaseRequest {
    pub email: String,
    /// Price of the item in pence
    pub pence: i32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PointsPurchaseResponse {
    /// The price was not positive, nothing was looked up or charged
    Ignored,
    Completed {
        email: String,
        points_spent: u32,
        /// Number of loyalty points after the purchase
        balance: u32,
        usage_count: u32,
    },
}

impl<F, R> Service<PointsPurchaseRequest> for DomainLogic<F, R>
where
    F: CardFactoryPort + 'static,
    R: RegistryPort + 'static,
{
    type Response = PointsPurchaseResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: PointsPurchaseRequest) -> Self::Future {
        let registry = self.registry.clone();
        Box::pin(async move {
            if req.pence <= 0 {
                debug!(
                    email = %req.email,
                    pence = req.pence,
                    "ignoring non-positive points purchase"
                );
                return Ok(PointsPurchaseResponse::Ignored);
            }

            // The registry checks the balance and deducts under the same lock
            let card = registry
                .use_points(&req.email, req.pence)
                .await
                .map_err(|err| {
                    debug!(
                        email = %req.email,
                        pence = req.pence,
                        error = %err,
                        "points purchase rejected"
                    );
                    err
                })?;

            info!(
                email = %req.email,
                pence = req.pence,
                balance = card.balance(),
                "points purchase processed"
            );
            Ok(PointsPurchaseResponse::Completed {
                email: req.email,
                points_spent: req.pence.unsigned_abs(),
                balance: card.balance(),
                usage_count: card.usage_count(),
            })
        })
    }
}
