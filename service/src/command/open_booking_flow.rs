//! [`Command`] for opening a new booking [`Flow`].

use common::operations::{By, Insert, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking::Flow, driver, spot, Spot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for opening a new booking [`Flow`] for a [`Spot`].
#[derive(Clone, Debug)]
pub struct OpenBookingFlow {
    /// ID of the [`Spot`] to be booked.
    pub spot_id: spot::Id,

    /// ID of the driver opening the [`Flow`], if known.
    pub driver_id: Option<driver::Id>,
}

impl<Db, Pay> Command<OpenBookingFlow> for Service<Db, Pay>
where
    Db: Database<
            Select<By<Option<Spot>, spot::Id>>,
            Ok = Option<Spot>,
            Err = Traced<database::Error>,
        > + Database<Insert<Flow>, Err = Traced<database::Error>>,
{
    type Ok = Flow;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: OpenBookingFlow,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let OpenBookingFlow { spot_id, driver_id } = cmd;

        let spot = self
            .database()
            .execute(Select(By::new(spot_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::SpotNotExists(spot_id))
            .map_err(tracerr::wrap!())?;
        if !spot.available {
            return Err(tracerr::new!(E::SpotUnavailable(spot.id)));
        }

        let flow = Flow::open(spot.id, driver_id);
        self.database()
            .execute(Insert(flow.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            flow.id = %flow.id,
            spot.id = %flow.spot_id,
            "booking flow opened",
        );

        Ok(flow)
    }
}

/// Error of [`OpenBookingFlow`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Spot`] with the provided ID does not exist.
    #[display("`Spot(id: {_0})` does not exist")]
    SpotNotExists(#[error(not(source))] spot::Id),

    /// [`Spot`] is not open for booking.
    #[display("`Spot(id: {_0})` is not available for booking")]
    SpotUnavailable(#[error(not(source))] spot::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{
            booking::{flow::Stage, Details},
            spot::{self, fixture},
        },
        infra::InMemory,
        query,
        test::{service, Scripted},
        Command as _, Config, Service,
    };

    use super::{ExecutionError, OpenBookingFlow};

    #[tokio::test]
    async fn opens_flow_at_details() {
        let svc = service(Scripted::default());

        let flow = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-1").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap();

        assert_eq!(flow.stage(), &Stage::Details);
        assert_eq!(flow.details(), Some(&Details::default()));
        let stored = svc
            .execute(query::booking_flow::ById::by(flow.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, flow.id);
    }

    #[tokio::test]
    async fn reopening_starts_fresh() {
        let svc = service(Scripted::default());
        let open = || OpenBookingFlow {
            spot_id: spot::Id::new("spot-1").unwrap(),
            driver_id: None,
        };

        let first = svc.execute(open()).await.unwrap();
        let second = svc.execute(open()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.stage(), &Stage::Details);
    }

    #[tokio::test]
    async fn fails_for_unknown_spot() {
        let svc = service(Scripted::default());

        let err = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-404").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::SpotNotExists(_)));
    }

    #[tokio::test]
    async fn fails_for_unavailable_spot() {
        let mut closed = fixture::spot("closed", 10, spot::Facility::Lot, &[]);
        closed.available = false;
        let svc = Service::new(
            Config {
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(b"_"),
                evict_stale_flows: crate::task::evict_stale_flows::Config {
                    interval: std::time::Duration::from_secs(60),
                    timeout: std::time::Duration::from_secs(60 * 30),
                },
            },
            InMemory::new(vec![closed]),
            Scripted::default(),
        );

        let err = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("closed").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::SpotUnavailable(_)));
    }
}
