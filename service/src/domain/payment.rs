//! Payment definitions.

use std::{fmt, sync::LazyLock};

use common::{define_kind, Money};
use derive_more::{AsRef, Debug, Display, Error, From};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret, ExposeSecret as _, SecretBox};

#[cfg(doc)]
use crate::domain::Booking;

/// Payment details entered by a driver, not validated yet.
#[derive(Clone, Debug)]
pub struct Draft {
    /// Number of the card to pay with.
    pub card_number: SecretBox<CardNumber>,

    /// Name of the card holder.
    pub cardholder: String,

    /// Card expiry in `MM/YY` format.
    pub expiry: String,

    /// Security code of the card.
    pub cvv: SecretBox<Cvv>,
}

impl Draft {
    /// Validates this [`Draft`] into a [`Card`].
    ///
    /// # Errors
    ///
    /// With a [`Violation`] for every invalid field.
    pub fn validate(self) -> Result<Card, Violations> {
        let mut violations = Vec::new();

        let number = self.card_number.expose_secret();
        if number.digits_count() < CardNumber::MIN_DIGITS {
            violations.push(Violation {
                field: Field::CardNumber,
                message: "Card number must be at least 16 digits",
            });
        } else if !number.is_well_formed() {
            violations.push(Violation {
                field: Field::CardNumber,
                message: "Card number must contain only digits",
            });
        }

        let cardholder = Cardholder::new(&self.cardholder);
        if cardholder.is_none() {
            violations.push(Violation {
                field: Field::Cardholder,
                message: "Cardholder name is required",
            });
        }

        let expiry = Expiry::new(&self.expiry);
        if self.expiry.trim().len() < Expiry::LEN {
            violations.push(Violation {
                field: Field::Expiry,
                message: "Expiry date is required",
            });
        } else if expiry.is_none() {
            violations.push(Violation {
                field: Field::Expiry,
                message: "Expiry date must match MM/YY",
            });
        }

        if !self.cvv.expose_secret().is_well_formed() {
            violations.push(Violation {
                field: Field::Cvv,
                message: "CVV must be at least 3 digits",
            });
        }

        match (cardholder, expiry) {
            (Some(cardholder), Some(expiry)) if violations.is_empty() => {
                Ok(Card {
                    number: self.card_number,
                    cardholder,
                    expiry,
                    cvv: self.cvv,
                })
            }
            _ => Err(Violations(violations)),
        }
    }
}

/// Card number, as entered by a driver.
#[derive(Clone, Debug, From)]
#[debug("CardNumber(..)")]
#[from(&str, String)]
pub struct CardNumber(String);

impl CardNumber {
    /// Minimal number of digits in a [`CardNumber`].
    pub const MIN_DIGITS: usize = 16;

    /// Counts the digits of this [`CardNumber`], ignoring separating spaces.
    fn digits_count(&self) -> usize {
        self.0.chars().filter(char::is_ascii_digit).count()
    }

    /// Checks whether this [`CardNumber`] has enough digits and consists of
    /// digits and spaces only.
    fn is_well_formed(&self) -> bool {
        self.digits_count() >= Self::MIN_DIGITS
            && self.0.chars().all(|c| c.is_ascii_digit() || c == ' ')
    }

    /// Returns the last four digits of this [`CardNumber`].
    fn last_digits(&self) -> String {
        let digits = self
            .0
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<Vec<_>>();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

impl CloneableSecret for CardNumber {}
impl Zeroize for CardNumber {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Card security code, as entered by a driver.
#[derive(Clone, Debug, From)]
#[debug("Cvv(..)")]
#[from(&str, String)]
pub struct Cvv(String);

impl Cvv {
    /// Checks whether this [`Cvv`] consists of at least 3 digits.
    fn is_well_formed(&self) -> bool {
        /// Regular expression checking [`Cvv`] format.
        static REGEX: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^\d{3,}$").expect("valid regex"));

        REGEX.is_match(&self.0)
    }
}

impl CloneableSecret for Cvv {}
impl Zeroize for Cvv {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Name of a card holder.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Cardholder(String);

impl Cardholder {
    /// Creates a new [`Cardholder`] out of the provided `name`, trimming
    /// surrounding whitespace.
    ///
    /// [`None`] is returned if the trimmed `name` is shorter than 2
    /// characters or longer than 256 bytes.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref().trim();
        (name.chars().count() >= 2 && name.len() <= 256)
            .then(|| Self(name.to_owned()))
    }
}

/// Card expiry in `MM/YY` format.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Expiry(String);

impl Expiry {
    /// Length of a well-formed [`Expiry`].
    pub const LEN: usize = 5;

    /// Creates a new [`Expiry`] if the provided `expiry` matches `MM/YY`.
    #[must_use]
    pub fn new(expiry: impl AsRef<str>) -> Option<Self> {
        /// Regular expression checking [`Expiry`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").expect("valid regex")
        });

        let expiry = expiry.as_ref().trim();
        REGEX.is_match(expiry).then(|| Self(expiry.to_owned()))
    }
}

/// Validated payment card.
#[derive(Clone, Debug)]
pub struct Card {
    /// [`CardNumber`] of this [`Card`].
    pub number: SecretBox<CardNumber>,

    /// [`Cardholder`] of this [`Card`].
    pub cardholder: Cardholder,

    /// [`Expiry`] of this [`Card`].
    pub expiry: Expiry,

    /// [`Cvv`] of this [`Card`].
    pub cvv: SecretBox<Cvv>,
}

impl Card {
    /// Returns the [`MaskedCard`] representation of this [`Card`] safe to be
    /// stored.
    #[must_use]
    pub fn masked(&self) -> MaskedCard {
        MaskedCard {
            last_digits: self.number.expose_secret().last_digits(),
        }
    }
}

/// Request to charge a [`Card`] for the provided amount.
#[derive(Clone, Debug)]
pub struct Charge {
    /// [`Card`] to be charged.
    pub card: Card,

    /// Amount to be charged.
    pub amount: Money,
}

/// Card number with everything except the last four digits hidden.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaskedCard {
    /// Last four digits of the card number.
    last_digits: String,
}

impl MaskedCard {
    /// Masks the provided card `number`.
    ///
    /// [`None`] is returned if the `number` contains less than four digits.
    #[must_use]
    pub fn new(number: impl AsRef<str>) -> Option<Self> {
        let last_digits = CardNumber(number.as_ref().to_owned()).last_digits();
        (last_digits.len() == 4).then_some(Self { last_digits })
    }

    /// Returns the last four digits of the card number.
    #[must_use]
    pub fn last_digits(&self) -> &str {
        &self.last_digits
    }
}

impl Display for MaskedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**** **** **** {}", self.last_digits)
    }
}

define_kind! {
    #[doc = "Field of a payment [`Draft`]."]
    enum Field {
        #[doc = "[`Draft::card_number`]."]
        CardNumber = 1,

        #[doc = "[`Draft::cardholder`]."]
        Cardholder = 2,

        #[doc = "[`Draft::expiry`]."]
        Expiry = 3,

        #[doc = "[`Draft::cvv`]."]
        Cvv = 4,
    }
}

/// Invalid [`Field`] of a payment [`Draft`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[display("{field}: {message}")]
pub struct Violation {
    /// Invalid [`Field`].
    pub field: Field,

    /// Human-readable description of the problem.
    pub message: &'static str,
}

/// Non-empty collection of [`Violation`]s.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub struct Violations(#[error(not(source))] Vec<Violation>);

impl Violations {
    /// Returns the [`Violation`]s.
    #[must_use]
    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    /// Returns the [`Violation`] of the provided [`Field`], if any.
    #[must_use]
    pub fn of(&self, field: Field) -> Option<&Violation> {
        self.0.iter().find(|v| v.field == field)
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, v) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Reason a payment was declined by a gateway.
#[derive(AsRef, Clone, Debug, Display, Eq, From, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
pub struct DeclineReason(String);

/// Outcome of a payment authorization.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Payment is approved and the [`Booking`] may be submitted.
    Approved,

    /// Payment is declined for the provided [`DeclineReason`].
    Declined(DeclineReason),
}


#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use super::{fixture::draft, Field, MaskedCard};

    #[test]
    fn accepts_valid_draft() {
        let card = draft("4111111111111111").validate().unwrap();

        assert_eq!(card.cardholder.to_string(), "Jane Doe");
        assert_eq!(card.expiry.to_string(), "12/29");
        assert_eq!(card.masked().last_digits(), "1111");
    }

    #[test]
    fn accepts_spaced_card_number() {
        let card = draft("4242 4242 4242 4242").validate().unwrap();

        assert_eq!(card.masked().to_string(), "**** **** **** 4242");
    }

    #[test]
    fn rejects_short_card_number() {
        let violations = draft("1234").validate().unwrap_err();

        assert_eq!(violations.as_slice().len(), 1);
        assert_eq!(
            violations.of(Field::CardNumber).unwrap().message,
            "Card number must be at least 16 digits",
        );
    }

    #[test]
    fn spaces_do_not_count_as_digits() {
        for number in [" ".repeat(16), "4111 1111 1111 111 ".to_owned()] {
            let violations = draft(&number).validate().unwrap_err();

            assert_eq!(
                violations.of(Field::CardNumber).unwrap().message,
                "Card number must be at least 16 digits",
            );
        }
    }

    #[test]
    fn rejects_non_digit_card_number() {
        let violations = draft("4111-1111-1111-1111").validate().unwrap_err();

        assert!(violations.of(Field::CardNumber).is_some());
    }

    #[test]
    fn reports_every_invalid_field() {
        let mut invalid = draft("4111111111111111");
        invalid.cardholder = " J ".into();
        invalid.expiry = "13/29".into();
        invalid.cvv = SecretBox::init_with(|| "12".into());

        let violations = invalid.validate().unwrap_err();

        assert_eq!(
            violations.as_slice().iter().map(|v| v.field).collect::<Vec<_>>(),
            [Field::Cardholder, Field::Expiry, Field::Cvv],
        );
        assert_eq!(
            violations.of(Field::Expiry).unwrap().message,
            "Expiry date must match MM/YY",
        );
    }

    #[test]
    fn requires_expiry() {
        let mut invalid = draft("4111111111111111");
        invalid.expiry = "1/2".into();

        let violations = invalid.validate().unwrap_err();

        assert_eq!(
            violations.of(Field::Expiry).unwrap().message,
            "Expiry date is required",
        );
    }

    #[test]
    fn masks_card_numbers() {
        assert_eq!(
            MaskedCard::new("5555 4444 3333 1234").unwrap().last_digits(),
            "1234",
        );
        assert!(MaskedCard::new("12").is_none());
    }

    #[test]
    fn secrets_are_redacted_from_debug() {
        let debug = format!("{:?}", draft("4111111111111111"));

        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("123"));
    }
}
