//! [`Flow`] of booking a [`Spot`].

use common::{define_kind, unit, Date, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::{booking::Submission, Spot};
use crate::domain::{
    booking::{self, Details},
    driver,
    payment::{self, DeclineReason, Violations},
    spot,
};

/// Multi-stage process of booking a single [`Spot`]:
/// [`Stage::Details`] → [`Stage::Payment`] → [`Stage::Submitted`].
///
/// A [`Flow`] exclusively owns its [`Details`], so no two [`Flow`]s contend
/// over the same draft. Once submitted, the [`Details`] are dropped and only
/// the ID of the emitted [`Booking`] is kept.
///
/// [`Booking`]: crate::domain::Booking
#[derive(Clone, Debug)]
pub struct Flow {
    /// ID of this [`Flow`].
    pub id: Id,

    /// ID of the [`Spot`] being booked.
    pub spot_id: spot::Id,

    /// ID of the driver booking the [`Spot`], if known.
    pub driver_id: Option<driver::Id>,

    /// [`Details`] entered so far, until submitted.
    details: Option<Details>,

    /// Current [`Stage`] of this [`Flow`].
    stage: Stage,

    /// [`ActivityDateTime`] of the last transition of this [`Flow`].
    touched_at: ActivityDateTime,
}

impl Flow {
    /// Opens a new [`Flow`] for the provided [`Spot`] with default
    /// [`Details`].
    #[must_use]
    pub fn open(spot_id: spot::Id, driver_id: Option<driver::Id>) -> Self {
        Self {
            id: Id::new(),
            spot_id,
            driver_id,
            details: Some(Details::default()),
            stage: Stage::Details,
            touched_at: ActivityDateTime::now(),
        }
    }

    /// Returns the [`Details`] entered so far, if this [`Flow`] is not
    /// submitted yet.
    #[must_use]
    pub fn details(&self) -> Option<&Details> {
        self.details.as_ref()
    }

    /// Returns the current [`Stage`] of this [`Flow`].
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Returns the [`ActivityDateTime`] of the last transition of this
    /// [`Flow`].
    #[must_use]
    pub fn touched_at(&self) -> ActivityDateTime {
        self.touched_at
    }

    /// Indicates whether this [`Flow`] is abandoned: it's not processing a
    /// payment and hasn't moved since the provided `deadline`.
    #[must_use]
    pub fn is_stale(&self, deadline: ActivityDateTime) -> bool {
        !self.is_processing() && self.touched_at <= deadline
    }

    /// Indicates whether a payment of this [`Flow`] is being processed.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        matches!(
            self.stage,
            Stage::Payment {
                processing: true,
                ..
            },
        )
    }

    /// Accepts the provided [`Details`] and advances to [`Stage::Payment`],
    /// returning the total price computed out of the `hourly_rate`.
    ///
    /// # Errors
    ///
    /// - If this [`Flow`] is not at [`Stage::Details`].
    /// - If no [`Date`] is picked, or it's before `today`.
    /// - If the total price overflows.
    pub fn submit_details(
        &mut self,
        details: Details,
        hourly_rate: Money,
        today: Date,
    ) -> Result<Money, TransitionError> {
        self.expect(StageKind::Details)?;

        let date = details.date.ok_or(TransitionError::DateMissing)?;
        if date < today {
            return Err(TransitionError::DateInPast(date));
        }
        let total = hourly_rate
            .checked_times(details.duration.hours().into())
            .ok_or(TransitionError::TotalOverflow)?;

        self.details = Some(details);
        self.stage = Stage::Payment {
            date,
            total,
            processing: false,
            declined: None,
        };
        self.touch();
        Ok(total)
    }

    /// Validates the provided payment [`payment::Draft`] and enters the
    /// processing sub-state of [`Stage::Payment`], returning the validated
    /// [`payment::Card`] along with the [`Order`] being paid for.
    ///
    /// Nothing changes if the [`payment::Draft`] is invalid.
    ///
    /// # Errors
    ///
    /// - If this [`Flow`] is not at [`Stage::Payment`].
    /// - If a payment is being processed already.
    /// - If the [`payment::Draft`] is invalid.
    pub fn begin_payment(
        &mut self,
        draft: payment::Draft,
    ) -> Result<(payment::Card, Order), TransitionError> {
        let actual = self.stage.kind();
        let Stage::Payment {
            date,
            total,
            processing,
            declined,
        } = &mut self.stage
        else {
            return Err(TransitionError::WrongStage {
                expected: StageKind::Payment,
                actual,
            });
        };
        if *processing {
            return Err(TransitionError::AlreadyProcessing);
        }

        let card = draft.validate()?;
        let order = Order {
            spot_id: self.spot_id.clone(),
            driver_id: self.driver_id,
            details: self.details.clone().unwrap_or_default(),
            date: *date,
            total: *total,
        };

        *processing = true;
        *declined = None;
        self.touch();
        Ok((card, order))
    }

    /// Finishes the payment being processed with the submitted
    /// [`booking::Id`], advancing to [`Stage::Submitted`] and dropping the
    /// entered [`Details`].
    ///
    /// # Errors
    ///
    /// If no payment is being processed.
    pub fn complete(
        &mut self,
        booking_id: booking::Id,
    ) -> Result<(), TransitionError> {
        _ = self.processing_mut()?;
        self.stage = Stage::Submitted { booking_id };
        self.details = None;
        self.touch();
        Ok(())
    }

    /// Finishes the payment being processed as declined, staying at
    /// [`Stage::Payment`].
    ///
    /// # Errors
    ///
    /// If no payment is being processed.
    pub fn decline(
        &mut self,
        reason: DeclineReason,
    ) -> Result<(), TransitionError> {
        let (processing, declined) = self.processing_mut()?;
        *processing = false;
        *declined = Some(reason);
        self.touch();
        Ok(())
    }

    /// Abandons the payment being processed without any outcome, so it may be
    /// submitted again.
    ///
    /// # Errors
    ///
    /// If no payment is being processed.
    pub fn abort_payment(&mut self) -> Result<(), TransitionError> {
        let (processing, _) = self.processing_mut()?;
        *processing = false;
        self.touch();
        Ok(())
    }

    /// Returns from [`Stage::Payment`] back to [`Stage::Details`], keeping the
    /// entered [`Details`].
    ///
    /// # Errors
    ///
    /// - If this [`Flow`] is not at [`Stage::Payment`].
    /// - If a payment is being processed.
    pub fn go_back(&mut self) -> Result<(), TransitionError> {
        match self.stage {
            Stage::Payment {
                processing: true, ..
            } => Err(TransitionError::AlreadyProcessing),
            Stage::Payment { .. } => {
                self.stage = Stage::Details;
                self.touch();
                Ok(())
            }
            Stage::Details | Stage::Submitted { .. } => {
                Err(self.wrong_stage(StageKind::Payment))
            }
        }
    }

    /// Returns the [`Date`] and the total price to be paid, if this [`Flow`]
    /// is at [`Stage::Payment`].
    #[must_use]
    pub fn payment_terms(&self) -> Option<(Date, Money)> {
        match self.stage {
            Stage::Payment { date, total, .. } => Some((date, total)),
            Stage::Details | Stage::Submitted { .. } => None,
        }
    }

    /// Records a transition of this [`Flow`] happening now.
    fn touch(&mut self) {
        self.touched_at = ActivityDateTime::now();
    }

    /// Returns mutable flags of the payment being processed.
    fn processing_mut(
        &mut self,
    ) -> Result<(&mut bool, &mut Option<DeclineReason>), TransitionError> {
        let actual = self.stage.kind();
        match &mut self.stage {
            Stage::Payment {
                processing,
                declined,
                ..
            } if *processing => Ok((processing, declined)),
            Stage::Payment { .. } => Err(TransitionError::NotProcessing),
            Stage::Details | Stage::Submitted { .. } => {
                Err(TransitionError::WrongStage {
                    expected: StageKind::Payment,
                    actual,
                })
            }
        }
    }

    /// Checks this [`Flow`] is at the `expected` [`Stage`].
    fn expect(&self, expected: StageKind) -> Result<(), TransitionError> {
        if self.stage.kind() == expected {
            Ok(())
        } else {
            Err(self.wrong_stage(expected))
        }
    }

    /// Creates a [`TransitionError::WrongStage`] for the `expected` [`Stage`].
    fn wrong_stage(&self, expected: StageKind) -> TransitionError {
        TransitionError::WrongStage {
            expected,
            actual: self.stage.kind(),
        }
    }
}

/// [`DateTimeOf`] the last transition of a [`Flow`].
pub type ActivityDateTime = DateTimeOf<(Flow, unit::Activity)>;

/// What a [`Flow`] processing a payment is paying for.
///
/// Outlives the [`Flow`] itself, so a payment authorized after the [`Flow`]
/// is closed still emits its [`Submission`].
#[derive(Clone, Debug)]
pub struct Order {
    /// ID of the [`Spot`] being booked.
    pub spot_id: spot::Id,

    /// ID of the driver booking the [`Spot`], if known.
    pub driver_id: Option<driver::Id>,

    /// [`Details`] of the booking.
    pub details: Details,

    /// [`Date`] the [`Spot`] is booked for.
    pub date: Date,

    /// Total price to be paid.
    pub total: Money,
}

/// ID of a [`Flow`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Stage of a [`Flow`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    /// Driver enters booking [`Details`].
    Details,

    /// Driver enters payment details.
    Payment {
        /// [`Date`] the [`Spot`] is booked for.
        date: Date,

        /// Total price to be paid.
        total: Money,

        /// Indicator whether a payment is being processed right now.
        processing: bool,

        /// [`DeclineReason`] of the last declined payment, if any.
        declined: Option<DeclineReason>,
    },

    /// [`Submission`] is emitted. Terminal.
    Submitted {
        /// ID of the submitted [`Booking`].
        ///
        /// [`Booking`]: crate::domain::Booking
        booking_id: booking::Id,
    },
}

impl Stage {
    /// Returns the [`StageKind`] of this [`Stage`].
    #[must_use]
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Details => StageKind::Details,
            Self::Payment { .. } => StageKind::Payment,
            Self::Submitted { .. } => StageKind::Submitted,
        }
    }
}

define_kind! {
    #[doc = "Kind of a [`Stage`]."]
    enum StageKind {
        #[doc = "[`Stage::Details`]."]
        Details = 1,

        #[doc = "[`Stage::Payment`]."]
        Payment = 2,

        #[doc = "[`Stage::Submitted`]."]
        Submitted = 3,
    }
}

/// Error of a [`Flow`] transition. The [`Flow`] is left intact.
#[derive(Debug, Display, Error, From)]
pub enum TransitionError {
    /// [`Flow`] is at an unexpected [`Stage`].
    #[display("`Flow` is at `{actual}` stage, but `{expected}` is expected")]
    WrongStage {
        /// Expected [`StageKind`].
        expected: StageKind,

        /// Actual [`StageKind`].
        actual: StageKind,
    },

    /// No [`Date`] is picked.
    #[display("Booking date is required")]
    DateMissing,

    /// Picked [`Date`] is in the past.
    #[display("Booking date `{_0}` is in the past")]
    DateInPast(#[error(not(source))] Date),

    /// Total price doesn't fit into [`Money`].
    #[display("Total price is too large")]
    TotalOverflow,

    /// Payment [`payment::Draft`] is invalid.
    #[display("Invalid payment details: {_0}")]
    #[from]
    InvalidPayment(#[error(not(source))] Violations),

    /// Payment is being processed already.
    #[display("Payment is being processed already")]
    AlreadyProcessing,

    /// No payment is being processed.
    #[display("No payment is being processed")]
    NotProcessing,
}
