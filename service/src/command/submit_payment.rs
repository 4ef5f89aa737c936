//! [`Command`] for submitting a payment of a [`Flow`].

use common::operations::{By, Lock};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        booking::{
            flow::{self, TransitionError},
            Flow,
        },
        payment,
    },
    infra::{database, database::Locked, Database},
    Service,
};

use super::{complete_payment::CompletePayment, Command};

/// [`Command`] for submitting a payment [`payment::Draft`] of a [`Flow`].
///
/// Only validates the [`payment::Draft`] and marks the [`Flow`] as
/// processing: the authorization itself is done by the returned
/// [`CompletePayment`], which is meant to be executed in background.
/// While it's not finished, any other [`SubmitPayment`] of the same [`Flow`]
/// fails, though the [`Flow`] may still be closed.
#[derive(Clone, Debug)]
pub struct SubmitPayment {
    /// ID of the [`Flow`] to pay for.
    pub flow_id: flow::Id,

    /// Payment details entered by the driver.
    pub payment: payment::Draft,
}

/// Payment accepted for processing.
#[derive(Debug)]
pub struct Pending {
    /// [`Flow`] snapshot in the processing state.
    pub flow: Flow,

    /// [`Command`] finishing the payment.
    pub completion: CompletePayment,
}

impl<Db, Pay> Command<SubmitPayment> for Service<Db, Pay>
where
    Db: Database<
        Lock<By<Option<Locked<Flow>>, flow::Id>>,
        Ok = Option<Locked<Flow>>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Pending;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SubmitPayment) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SubmitPayment { flow_id, payment } = cmd;

        let mut flow = self
            .database()
            .execute(Lock(By::new(flow_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::FlowNotExists(flow_id))
            .map_err(tracerr::wrap!())?;

        let (card, order) = flow
            .begin_payment(payment)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        log::info!(
            flow.id = %flow.id,
            card = %card.masked(),
            amount = %order.total,
            "payment submitted for processing",
        );

        Ok(Pending {
            flow: flow.clone(),
            completion: CompletePayment {
                flow_id,
                charge: payment::Charge {
                    card,
                    amount: order.total,
                },
                order,
            },
        })
    }
}

/// Error of [`SubmitPayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Flow`] with the provided ID does not exist.
    #[display("`Flow(id: {_0})` does not exist")]
    FlowNotExists(#[error(not(source))] flow::Id),

    /// [`Flow`] cannot accept the payment.
    #[display("{_0}")]
    #[from]
    Transition(TransitionError),
}

#[cfg(test)]
mod spec {
    use std::sync::atomic::Ordering;

    use common::Date;

    use crate::{
        command::{CloseBookingFlow, OpenBookingFlow, SubmitBookingDetails},
        domain::{
            booking::{
                flow::{self, Stage, TransitionError},
                Details, Duration,
            },
            payment::{fixture::draft, Field},
            spot,
        },
        infra::InMemory,
        query,
        read,
        test::{service, Scripted},
        Command as _, Service,
    };

    use super::{ExecutionError, SubmitPayment};

    async fn flow_at_payment(svc: &Service<InMemory, Scripted>) -> flow::Id {
        let flow = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-1").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap();
        _ = svc
            .execute(SubmitBookingDetails {
                flow_id: flow.id,
                details: Details {
                    date: Some(Date::today()),
                    duration: Duration::TwoHours,
                    ..Details::default()
                },
            })
            .await
            .unwrap();
        flow.id
    }

    #[tokio::test]
    async fn short_card_number_keeps_payment_stage() {
        let gateway = Scripted::default();
        let svc = service(gateway.clone());
        let flow_id = flow_at_payment(&svc).await;

        let err = svc
            .execute(SubmitPayment {
                flow_id,
                payment: draft("1234"),
            })
            .await
            .unwrap_err();

        let ExecutionError::Transition(TransitionError::InvalidPayment(v)) =
            err.as_ref()
        else {
            panic!("expected `InvalidPayment`, got: {err}");
        };
        assert!(v.of(Field::CardNumber).is_some());
        let flow = svc
            .execute(query::booking_flow::ById::by(flow_id))
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            flow.stage(),
            Stage::Payment {
                processing: false,
                ..
            },
        ));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_card_submits_booking() {
        let svc = service(Scripted::default());
        let flow_id = flow_at_payment(&svc).await;

        let pending = svc
            .execute(SubmitPayment {
                flow_id,
                payment: draft("4111111111111111"),
            })
            .await
            .unwrap();
        assert!(matches!(
            pending.flow.stage(),
            Stage::Payment {
                processing: true,
                ..
            },
        ));

        let flow = svc.execute(pending.completion).await.unwrap().unwrap();

        let Stage::Submitted { booking_id } = flow.stage() else {
            panic!("expected `Submitted` stage, got: {:?}", flow.stage());
        };
        let booking = svc
            .execute(query::booking::ById::by(*booking_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(booking.spot_id.to_string(), "spot-1");
        assert_eq!(booking.total.to_string(), "30USD");
        assert_eq!(booking.card.last_digits(), "1111");
    }

    #[tokio::test]
    async fn closing_while_processing_still_submits_booking() {
        let gateway = Scripted::default();
        let svc = service(gateway.clone());
        let flow_id = flow_at_payment(&svc).await;
        let pending = svc
            .execute(SubmitPayment {
                flow_id,
                payment: draft("4111111111111111"),
            })
            .await
            .unwrap();

        let closed = svc.execute(CloseBookingFlow { flow_id }).await.unwrap();
        assert_eq!(closed, flow_id);

        let flow = svc.execute(pending.completion).await.unwrap();

        assert!(flow.is_none());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        let bookings = svc
            .execute(query::bookings::List::by(
                read::booking::list::Filter::default(),
            ))
            .await
            .unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].total.to_string(), "30USD");
        let stored = svc
            .execute(query::booking_flow::ById::by(flow_id))
            .await
            .unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn guards_against_duplicate_submission() {
        let gateway = Scripted::default();
        let svc = service(gateway.clone());
        let flow_id = flow_at_payment(&svc).await;

        let pending = svc
            .execute(SubmitPayment {
                flow_id,
                payment: draft("4111111111111111"),
            })
            .await
            .unwrap();
        let err = svc
            .execute(SubmitPayment {
                flow_id,
                payment: draft("4111111111111111"),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Transition(TransitionError::AlreadyProcessing),
        ));

        let completion = tokio::spawn({
            let svc = svc.clone();
            async move { svc.execute(pending.completion).await }
        });
        let flow = completion.await.unwrap().unwrap().unwrap();
        assert!(matches!(flow.stage(), Stage::Submitted { .. }));

        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        let bookings = svc
            .execute(query::bookings::List::by(
                read::booking::list::Filter::default(),
            ))
            .await
            .unwrap();
        assert_eq!(bookings.len(), 1);
    }
}
