//! [`Command`] for completing a payment of a [`Flow`].

use common::{
    operations::{Authorize, By, Insert, Lock, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::command::SubmitPayment;
use crate::{
    domain::{
        booking::{
            self,
            flow::{self, Order, TransitionError},
            Flow, Submission,
        },
        notification,
        payment::{self, Outcome},
        spot, Booking, Notification, Spot,
    },
    infra::{self, database, database::Locked, Database, Gateway},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a payment accepted by [`SubmitPayment`] and
/// submitting the resulting [`Booking`].
///
/// Once started, it runs to the end: the [`Flow`] stays processing until the
/// payment [`Gateway`] answers. If the [`Flow`] is closed meanwhile, an
/// approved payment still submits the [`Booking`] out of the [`Order`].
#[derive(Debug)]
pub struct CompletePayment {
    /// ID of the [`Flow`] being paid for.
    pub flow_id: flow::Id,

    /// [`payment::Charge`] to be authorized.
    pub charge: payment::Charge,

    /// [`Order`] being paid for.
    pub order: Order,
}

impl<Db, Pay> Command<CompletePayment> for Service<Db, Pay>
where
    Db: Database<
            Lock<By<Option<Locked<Flow>>, flow::Id>>,
            Ok = Option<Locked<Flow>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Spot>, spot::Id>>,
            Ok = Option<Spot>,
            Err = Traced<database::Error>,
        > + Database<Insert<Submission>, Err = Traced<database::Error>>
        + Database<Insert<Notification>, Err = Traced<database::Error>>,
    Pay: Gateway<
        Authorize<payment::Charge>,
        Ok = Outcome,
        Err = Traced<infra::payment::Error>,
    >,
{
    /// [`Flow`] after the payment, or [`None`] if it was closed meanwhile.
    type Ok = Option<Flow>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CompletePayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CompletePayment {
            flow_id,
            charge,
            order,
        } = cmd;

        // The `Flow` is not locked while waiting for the `Gateway`, so it can
        // still be read or closed.
        let outcome = self
            .payments()
            .execute(Authorize(charge.clone()))
            .await;

        let mut flow = self
            .database()
            .execute(Lock(By::new(flow_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let outcome = match outcome {
            Ok(o) => o,
            Err(e) => {
                if let Some(f) = flow.as_mut() {
                    f.abort_payment()
                        .map_err(tracerr::from_and_wrap!(=> E))?;
                }
                return Err(e).map_err(tracerr::map_from_and_wrap!(=> E));
            }
        };
        if let Outcome::Declined(reason) = outcome {
            log::warn!(flow.id = %flow_id, %reason, "payment declined");
            let Some(mut flow) = flow else {
                return Ok(None);
            };
            flow.decline(reason)
                .map_err(tracerr::from_and_wrap!(=> E))?;
            return Ok(Some(flow.clone()));
        }

        let booking_id = match self.submit(order, charge).await {
            Ok(id) => id,
            Err(e) => {
                if let Some(f) = flow.as_mut() {
                    f.abort_payment()
                        .map_err(tracerr::from_and_wrap!(=> E))?;
                }
                return Err(e);
            }
        };
        let Some(mut flow) = flow else {
            log::info!(
                flow.id = %flow_id,
                booking.id = %booking_id,
                "booking submitted for a closed flow",
            );
            return Ok(None);
        };
        flow.complete(booking_id)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        log::info!(
            flow.id = %flow_id,
            booking.id = %booking_id,
            "booking submitted",
        );
        Ok(Some(flow.clone()))
    }
}

impl<Db, Pay> Service<Db, Pay>
where
    Db: Database<
            Select<By<Option<Spot>, spot::Id>>,
            Ok = Option<Spot>,
            Err = Traced<database::Error>,
        > + Database<Insert<Submission>, Err = Traced<database::Error>>
        + Database<Insert<Notification>, Err = Traced<database::Error>>,
{
    /// Emits the [`Submission`] of the provided paid [`Order`], notifying the
    /// owner about the new request.
    async fn submit(
        &self,
        order: Order,
        charge: payment::Charge,
    ) -> Result<booking::Id, Traced<ExecutionError>> {
        use ExecutionError as E;

        let Order {
            spot_id,
            driver_id,
            details,
            date,
            total,
        } = order;
        let spot = self
            .database()
            .execute(Select(By::new(spot_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SpotNotExists(spot_id))
            .map_err(tracerr::wrap!())?;

        let booking = Booking {
            id: booking::Id::new(),
            spot_id: spot.id,
            spot_name: spot.name,
            driver_id,
            date,
            start_time: details.start_time,
            duration: details.duration,
            vehicle_type: details.vehicle_type,
            license_plate: details.license_plate,
            total,
            cardholder: charge.card.cardholder.clone(),
            card: charge.card.masked(),
            status: booking::Status::Pending,
            submitted_at: DateTime::now().coerce(),
        };
        let id = booking.id;
        let notification =
            Notification::about(notification::Kind::Requested, &booking);

        self.database()
            .execute(Insert(Submission {
                booking,
                card: charge.card,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        self.database()
            .execute(Insert(notification))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(id)
    }
}

/// Error of [`CompletePayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Payment [`Gateway`] error.
    #[display("Payment `Gateway` failed: {_0}")]
    #[from]
    Gateway(infra::payment::Error),

    /// [`Spot`] of the [`Flow`] does not exist anymore.
    #[display("`Spot(id: {_0})` does not exist")]
    SpotNotExists(#[error(not(source))] spot::Id),

    /// [`Flow`] is not processing a payment.
    #[display("{_0}")]
    #[from]
    Transition(TransitionError),
}

#[cfg(test)]
mod spec {
    use common::Date;
    use tracerr::Traced;

    use crate::{
        command::{OpenBookingFlow, SubmitBookingDetails, SubmitPayment},
        domain::{
            booking::{
                flow::{self, Stage},
                Details, Duration, Flow,
            },
            payment::fixture::draft,
            spot,
        },
        infra::InMemory,
        query, read,
        test::{service, Scripted},
        Command as _, Service,
    };

    use super::ExecutionError;

    type Svc = Service<InMemory, Scripted>;

    /// Pays for an 8 hours booking of `spot-3` via the provided [`Scripted`]
    /// gateway.
    async fn pay(
        gateway: Scripted,
    ) -> (Svc, flow::Id, Result<Option<Flow>, Traced<ExecutionError>>) {
        let svc = service(gateway);
        let flow = svc
            .execute(OpenBookingFlow {
                spot_id: spot::Id::new("spot-3").unwrap(),
                driver_id: None,
            })
            .await
            .unwrap();
        _ = svc
            .execute(SubmitBookingDetails {
                flow_id: flow.id,
                details: Details {
                    date: Some(Date::today()),
                    duration: Duration::EightHours,
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
        let result = svc.execute(pending.completion).await;
        (svc, flow.id, result)
    }

    async fn bookings_count(svc: &Svc) -> usize {
        svc.execute(query::bookings::List::by(
            read::booking::list::Filter::default(),
        ))
        .await
        .unwrap()
        .len()
    }

    #[tokio::test]
    async fn charges_total_amount() {
        let gateway = Scripted::default();

        let (svc, _, flow) = pay(gateway.clone()).await;

        let flow = flow.unwrap().unwrap();
        assert!(matches!(flow.stage(), Stage::Submitted { .. }));
        assert!(flow.details().is_none());
        assert_eq!(*gateway.charged.lock().unwrap(), ["64USD"]);
        assert_eq!(bookings_count(&svc).await, 1);
    }

    #[tokio::test]
    async fn declined_payment_stays_at_payment() {
        let gateway = Scripted {
            decline: Some("Insufficient funds".into()),
            ..Scripted::default()
        };

        let (svc, _, flow) = pay(gateway).await;

        let flow = flow.unwrap().unwrap();
        assert!(matches!(
            flow.stage(),
            Stage::Payment {
                processing: false,
                declined: Some(_),
                ..
            },
        ));
        assert_eq!(bookings_count(&svc).await, 0);
        let stored = svc
            .execute(query::booking_flow::ById::by(flow.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.stage(), flow.stage());
    }

    #[tokio::test]
    async fn unavailable_gateway_allows_retry() {
        let gateway = Scripted {
            unavailable: true,
            ..Scripted::default()
        };

        let (svc, flow_id, result) = pay(gateway).await;

        assert!(matches!(
            result.unwrap_err().as_ref(),
            ExecutionError::Gateway(_),
        ));
        assert_eq!(bookings_count(&svc).await, 0);
        let flow = svc
            .execute(query::booking_flow::ById::by(flow_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            flow.stage(),
            &Stage::Payment {
                date: Date::today(),
                total: flow.payment_terms().unwrap().1,
                processing: false,
                declined: None,
            },
        );
    }
}
