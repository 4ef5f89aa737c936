//! [`Command`] for closing a booking [`Flow`].

use common::operations::{By, Delete, Lock};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::booking::{flow, Flow},
    infra::{database, database::Locked, Database},
    Service,
};

use super::Command;

/// [`Command`] for closing a booking [`Flow`] at any [`Stage`], discarding
/// everything entered into it.
///
/// Closing doesn't cancel a payment being processed: once authorized, it
/// still submits the [`Booking`].
///
/// [`Booking`]: crate::domain::Booking
/// [`Stage`]: flow::Stage
#[derive(Clone, Copy, Debug)]
pub struct CloseBookingFlow {
    /// ID of the [`Flow`] to close.
    pub flow_id: flow::Id,
}

impl<Db, Pay> Command<CloseBookingFlow> for Service<Db, Pay>
where
    Db: Database<
            Lock<By<Option<Locked<Flow>>, flow::Id>>,
            Ok = Option<Locked<Flow>>,
            Err = Traced<database::Error>,
        > + Database<Delete<By<Flow, flow::Id>>, Err = Traced<database::Error>>,
{
    type Ok = flow::Id;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CloseBookingFlow,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CloseBookingFlow { flow_id } = cmd;

        let flow = self
            .database()
            .execute(Lock(By::new(flow_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::FlowNotExists(flow_id))
            .map_err(tracerr::wrap!())?;

        // Lock is held until removal, so no transition may happen meanwhile.
        self.database()
            .execute(Delete(By::new(flow_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            flow.id = %flow_id,
            stage = %flow.stage().kind(),
            "booking flow closed",
        );

        Ok(flow_id)
    }
}

/// Error of [`CloseBookingFlow`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Flow`] with the provided ID does not exist.
    #[display("`Flow(id: {_0})` does not exist")]
    FlowNotExists(#[error(not(source))] flow::Id),
}

#[cfg(test)]
mod spec {
    use common::Date;

    use crate::{
        command::{OpenBookingFlow, SubmitBookingDetails, SubmitPayment},
        domain::{booking::Details, payment::fixture::draft, spot},
        query,
        test::{service, Scripted},
        Command as _,
    };

    use super::{CloseBookingFlow, ExecutionError};

    #[tokio::test]
    async fn discards_flow() {
        let svc = service(Scripted::default());
        let flow = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-2").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap();
        _ = svc
            .execute(SubmitBookingDetails {
                flow_id: flow.id,
                details: Details {
                    date: Some(Date::today()),
                    ..Details::default()
                },
            })
            .await
            .unwrap();

        let closed = svc
            .execute(CloseBookingFlow { flow_id: flow.id })
            .await
            .unwrap();

        assert_eq!(closed, flow.id);
        let stored = svc
            .execute(query::booking_flow::ById::by(flow.id))
            .await
            .unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn closes_flow_processing_payment() {
        let svc = service(Scripted::default());
        let flow = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-2").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap();
        _ = svc
            .execute(SubmitBookingDetails {
                flow_id: flow.id,
                details: Details {
                    date: Some(Date::today()),
                    ..Details::default()
                },
            })
            .await
            .unwrap();
        let pending = svc
            .execute(SubmitPayment {
                flow_id: flow.id,
                payment: draft("4111111111111111"),
            })
            .await
            .unwrap();
        assert!(pending.flow.is_processing());

        let closed = svc
            .execute(CloseBookingFlow { flow_id: flow.id })
            .await
            .unwrap();

        assert_eq!(closed, flow.id);
        let stored = svc
            .execute(query::booking_flow::ById::by(flow.id))
            .await
            .unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn fails_for_closed_flow() {
        let svc = service(Scripted::default());
        let flow = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-1").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap();
        _ = svc
            .execute(CloseBookingFlow { flow_id: flow.id })
            .await
            .unwrap();

        let err = svc
            .execute(CloseBookingFlow { flow_id: flow.id })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::FlowNotExists(_)));
    }
}
