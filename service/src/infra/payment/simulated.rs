//! [`Simulated`] payment [`Gateway`].

use std::time::Duration;

use common::operations::Authorize;
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::payment::{Charge, Outcome},
    infra::payment::{self, Gateway},
};

/// [`Gateway`] approving every [`Charge`] after a fixed latency.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Simulated {
    /// Time it takes to authorize a [`Charge`].
    #[default(Duration::from_millis(1500))]
    pub latency: Duration,
}

impl Gateway<Authorize<Charge>> for Simulated {
    type Ok = Outcome;
    type Err = Traced<payment::Error>;

    async fn execute(
        &self,
        Authorize(charge): Authorize<Charge>,
    ) -> Result<Self::Ok, Self::Err> {
        log::debug!(
            card = %charge.card.masked(),
            amount = %charge.amount,
            "authorizing simulated payment",
        );

        tokio::time::sleep(self.latency).await;

        Ok(Outcome::Approved)
    }
}

#[cfg(test)]
mod spec {
    use std::time::{Duration, Instant};

    use common::{operations::Authorize, Money};
    use rust_decimal::Decimal;

    use crate::{
        domain::payment::{fixture::draft, Charge, Outcome},
        infra::Gateway as _,
    };

    use super::Simulated;

    #[tokio::test]
    async fn approves_after_latency() {
        let gateway = Simulated {
            latency: Duration::from_millis(10),
        };
        let charge = Charge {
            card: draft("4111111111111111").validate().unwrap(),
            amount: Money::usd(Decimal::from(45)),
        };

        let started = Instant::now();
        let outcome = gateway.execute(Authorize(charge)).await.unwrap();

        assert_eq!(outcome, Outcome::Approved);
        assert!(started.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn defaults_to_one_and_half_seconds() {
        assert_eq!(Simulated::default().latency, Duration::from_millis(1500));
    }
}
