//! Service contains the business logic of the parking marketplace: the
//! [`Spot`] catalog filtering and the booking [`Flow`].
//!
//! [`Flow`]: domain::booking::Flow
//! [`Spot`]: domain::Spot
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use derive_more::Debug;

#[cfg(doc)]
use infra::{Database, Gateway};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] decoding key of driver sessions.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub jwt_decoding_key: jsonwebtoken::DecodingKey,

    /// [`task::EvictStaleFlows`] configuration.
    pub evict_stale_flows: task::evict_stale_flows::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Pay> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// Payment [`Gateway`] of this [`Service`].
    payments: Pay,
}

impl<Db, Pay> Service<Db, Pay> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, database: Db, payments: Pay) -> Self {
        Self {
            config,
            database,
            payments,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns payment [`Gateway`] of this [`Service`].
    #[must_use]
    pub fn payments(&self) -> &Pay {
        &self.payments
    }
}

#[cfg(test)]
pub(crate) mod test {
    //! Test helpers for running [`Command`]s and [`Query`]s.

    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
        time,
    };

    use common::{operations::Authorize, Date};
    use tracerr::Traced;

    use crate::{
        command::{OpenBookingFlow, SubmitBookingDetails, SubmitPayment},
        domain::{
            booking::{self, flow::Stage, Details},
            payment::{fixture::draft, Charge, DeclineReason, Outcome},
            spot::{self, fixture::spot, Facility},
            Spot,
        },
        infra::{payment, Gateway, InMemory},
        task, Command as _, Config, Service,
    };

    /// Payment [`Gateway`] answering with a preset [`Outcome`] and counting
    /// its calls.
    #[derive(Clone, Debug, Default)]
    pub(crate) struct Scripted {
        /// [`DeclineReason`] to decline with, if any.
        pub(crate) decline: Option<DeclineReason>,

        /// Indicator whether this [`Gateway`] is unavailable.
        pub(crate) unavailable: bool,

        /// Number of [`Charge`]s authorized so far.
        pub(crate) calls: Arc<AtomicUsize>,

        /// Amounts of all the authorized [`Charge`]s.
        pub(crate) charged: Arc<Mutex<Vec<String>>>,
    }

    impl Gateway<Authorize<Charge>> for Scripted {
        type Ok = Outcome;
        type Err = Traced<payment::Error>;

        async fn execute(
            &self,
            Authorize(charge): Authorize<Charge>,
        ) -> Result<Self::Ok, Self::Err> {
            _ = self.calls.fetch_add(1, Ordering::SeqCst);
            self.charged.lock().unwrap().push(charge.amount.to_string());
            if self.unavailable {
                return Err(tracerr::new!(payment::Error::Unavailable(
                    "connection refused".into(),
                )));
            }
            Ok(self
                .decline
                .clone()
                .map_or(Outcome::Approved, Outcome::Declined))
        }
    }

    /// Catalog of test [`Spot`]s.
    pub(crate) fn catalog() -> Vec<Spot> {
        vec![
            spot("spot-1", 15, Facility::Garage, &[]),
            spot("spot-2", 20, Facility::Street, &[]),
            spot("spot-3", 8, Facility::Lot, &[]),
        ]
    }

    /// Creates a new [`Service`] over the test [`catalog()`] and the provided
    /// [`Scripted`] gateway.
    pub(crate) fn service(gateway: Scripted) -> Service<InMemory, Scripted> {
        Service::new(
            Config {
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                    SECRET,
                ),
                evict_stale_flows: task::evict_stale_flows::Config {
                    interval: time::Duration::from_secs(60),
                    timeout: time::Duration::from_secs(60 * 30),
                },
            },
            InMemory::new(catalog()),
            gateway,
        )
    }

    /// Walks a new booking of `spot-1` through the whole flow, returning the
    /// ID of the submitted [`booking::Booking`].
    pub(crate) async fn submitted_booking(
        svc: &Service<InMemory, Scripted>,
    ) -> booking::Id {
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
        let flow = svc.execute(pending.completion).await.unwrap().unwrap();
        let Stage::Submitted { booking_id } = flow.stage() else {
            panic!("expected `Submitted` stage, got: {:?}", flow.stage());
        };
        *booking_id
    }

    /// Secret the test [JWT]s are signed with.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    pub(crate) const SECRET: &[u8] = b"test-secret";
}
