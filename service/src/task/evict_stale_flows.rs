//! [`EvictStaleFlows`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::booking::Flow;
use crate::{
    domain::booking::flow,
    infra::{database, Database},
    Service,
};

use super::Task;

/// Configuration for [`EvictStaleFlows`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between stale [`Flow`]s evictions.
    pub interval: time::Duration,

    /// Time without transitions after which a [`Flow`] is considered
    /// abandoned.
    pub timeout: time::Duration,
}

/// [`Task`] for evicting abandoned [`Flow`]s, so the ones nobody closes
/// don't pile up.
#[derive(Clone, Copy, Debug)]
pub struct EvictStaleFlows<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<S> EvictStaleFlows<S> {
    /// Creates a new [`EvictStaleFlows`] [`Task`] over the provided
    /// [`Service`], to be [`Perform`]ed once.
    #[cfg(test)]
    pub(crate) fn new(config: Config, service: S) -> Self {
        Self { config, service }
    }
}

impl<Db, Pay> Task<Start<By<EvictStaleFlows<Self>, Config>>>
    for Service<Db, Pay>
where
    EvictStaleFlows<Self>:
        Task<Perform<()>, Ok = Vec<flow::Id>, Err: Error>,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<EvictStaleFlows<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = EvictStaleFlows {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(evicted) if !evicted.is_empty() => {
                    log::info!(count = evicted.len(), "stale flows evicted");
                }
                Ok(_) => {}
                Err(e) => log::error!("`task::EvictStaleFlows` failed: {e}"),
            }
        }
    }
}

impl<Db, Pay> Task<Perform<()>> for EvictStaleFlows<Service<Db, Pay>>
where
    Db: Database<
        Delete<By<Vec<flow::Id>, flow::ActivityDateTime>>,
        Ok = Vec<flow::Id>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<flow::Id>;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline = flow::ActivityDateTime::now() - self.config.timeout;
        self.service
            .database()
            .execute(Delete(By::new(deadline)))
            .await
            .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`EvictStaleFlows`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{operations::Perform, Date};

    use crate::{
        command::{OpenBookingFlow, SubmitBookingDetails, SubmitPayment},
        domain::{booking::Details, payment::fixture::draft, spot},
        query,
        test::{service, Scripted},
        Command as _,
    };

    use super::{Config, EvictStaleFlows};

    fn config(timeout: Duration) -> Config {
        Config {
            interval: Duration::from_secs(60),
            timeout,
        }
    }

    #[tokio::test]
    async fn evicts_idle_flows_only() {
        let svc = service(Scripted::default());
        let idle = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-1").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap();
        let paying = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-2").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap();
        _ = svc
            .execute(SubmitBookingDetails {
                flow_id: paying.id,
                details: Details {
                    date: Some(Date::today()),
                    ..Details::default()
                },
            })
            .await
            .unwrap();
        _ = svc
            .execute(SubmitPayment {
                flow_id: paying.id,
                payment: draft("4111111111111111"),
            })
            .await
            .unwrap();

        let task = EvictStaleFlows::new(config(Duration::ZERO), svc.clone());
        let evicted = task.execute(Perform(())).await.unwrap();

        assert_eq!(evicted, [idle.id]);
        let idle = svc
            .execute(query::booking_flow::ById::by(idle.id))
            .await
            .unwrap();
        assert!(idle.is_none());
        let paying = svc
            .execute(query::booking_flow::ById::by(paying.id))
            .await
            .unwrap();
        assert!(paying.is_some());
    }

    #[tokio::test]
    async fn keeps_recently_active_flows() {
        let svc = service(Scripted::default());
        let flow = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-1").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap();

        let timeout = Duration::from_secs(60 * 60);
        let task = EvictStaleFlows::new(config(timeout), svc.clone());
        let evicted = task.execute(Perform(())).await.unwrap();

        assert!(evicted.is_empty());
        let stored = svc
            .execute(query::booking_flow::ById::by(flow.id))
            .await
            .unwrap();
        assert!(stored.is_some());
    }
}
