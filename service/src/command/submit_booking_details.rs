//! [`Command`] for submitting booking [`Details`] of a [`Flow`].

use common::{
    operations::{By, Lock, Select},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        booking::{
            flow::{self, TransitionError},
            Details, Flow,
        },
        spot, Spot,
    },
    infra::{database, database::Locked, Database},
    Service,
};

use super::Command;

/// [`Command`] for submitting booking [`Details`] of a [`Flow`], advancing it
/// to the payment stage.
#[derive(Clone, Debug)]
pub struct SubmitBookingDetails {
    /// ID of the [`Flow`] to submit [`Details`] of.
    pub flow_id: flow::Id,

    /// Submitted [`Details`].
    pub details: Details,
}

impl<Db, Pay> Command<SubmitBookingDetails> for Service<Db, Pay>
where
    Db: Database<
            Lock<By<Option<Locked<Flow>>, flow::Id>>,
            Ok = Option<Locked<Flow>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Spot>, spot::Id>>,
            Ok = Option<Spot>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Flow;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SubmitBookingDetails,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubmitBookingDetails { flow_id, details } = cmd;

        let mut flow = self
            .database()
            .execute(Lock(By::new(flow_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::FlowNotExists(flow_id))
            .map_err(tracerr::wrap!())?;

        // Catalog is the source of truth for the price.
        let spot = self
            .database()
            .execute(Select(By::new(flow.spot_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::SpotNotExists(flow.spot_id.clone()))
            .map_err(tracerr::wrap!())?;
        if let Some(date) = details.date {
            if !spot.is_open_on(date) {
                return Err(tracerr::new!(E::SpotClosed(date)));
            }
        }

        let total = flow
            .submit_details(details, spot.price(), Date::today())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        log::debug!(
            flow.id = %flow.id,
            total = %total,
            "booking details submitted",
        );

        Ok(flow.clone())
    }
}

/// Error of [`SubmitBookingDetails`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Flow`] with the provided ID does not exist.
    #[display("`Flow(id: {_0})` does not exist")]
    FlowNotExists(#[error(not(source))] flow::Id),

    /// [`Spot`] is closed on the picked [`Date`].
    #[display("`Spot` is closed on {_0}")]
    SpotClosed(#[error(not(source))] Date),

    /// [`Spot`] of the [`Flow`] does not exist anymore.
    #[display("`Spot(id: {_0})` does not exist")]
    SpotNotExists(#[error(not(source))] spot::Id),

    /// [`Flow`] cannot accept the [`Details`].
    #[display("{_0}")]
    #[from]
    Transition(TransitionError),
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};
    use rust_decimal::Decimal;

    use crate::{
        command::{OpenBookingFlow, ReturnToDetails},
        domain::{
            booking::{
                flow::{self, Stage, TransitionError},
                Details, Duration, LicensePlate,
            },
            spot,
        },
        test::{service, Scripted},
        Command as _,
    };

    use super::{ExecutionError, SubmitBookingDetails};

    fn details(date: Date, duration: Duration) -> Details {
        Details {
            date: Some(date),
            duration,
            license_plate: LicensePlate::new("7ABC123").unwrap(),
            ..Details::default()
        }
    }

    #[tokio::test]
    async fn advances_to_payment_with_total() {
        let svc = service(Scripted::default());
        let flow = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-1").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap();

        let flow = svc
            .execute(SubmitBookingDetails {
                flow_id: flow.id,
                details: details(Date::today(), Duration::ThreeHours),
            })
            .await
            .unwrap();

        let Stage::Payment { total, .. } = flow.stage() else {
            panic!("expected `Payment` stage, got: {:?}", flow.stage());
        };
        assert_eq!(*total, Money::usd(Decimal::from(45)));
    }

    #[tokio::test]
    async fn going_back_keeps_details() {
        let svc = service(Scripted::default());
        let flow = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-2").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap();
        let submitted = details(Date::today(), Duration::TwoHours);

        let flow = svc
            .execute(SubmitBookingDetails {
                flow_id: flow.id,
                details: submitted.clone(),
            })
            .await
            .unwrap();
        assert_eq!(
            flow.payment_terms().map(|(_, total)| total),
            Some(Money::usd(Decimal::from(40))),
        );

        let flow = svc
            .execute(ReturnToDetails { flow_id: flow.id })
            .await
            .unwrap();

        assert_eq!(flow.stage(), &Stage::Details);
        assert_eq!(flow.details(), Some(&submitted));
    }

    #[tokio::test]
    async fn rejects_past_date() {
        let svc = service(Scripted::default());
        let flow = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-1").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap();

        let err = svc
            .execute(SubmitBookingDetails {
                flow_id: flow.id,
                details: details(
                    Date::today().previous_day().unwrap(),
                    Duration::OneHour,
                ),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::Transition(TransitionError::DateInPast(_)),
        ));
    }

    #[tokio::test]
    async fn fails_for_unknown_flow() {
        let svc = service(Scripted::default());

        let err = svc
            .execute(SubmitBookingDetails {
                flow_id: flow::Id::new(),
                details: details(Date::today(), Duration::OneHour),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::FlowNotExists(_)));
    }
}
