//! [`Error`]-related definitions.

use std::fmt;

use axum_extra::typed_header::TypedHeaderRejection;
use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::infra::database;
use tracerr::{Trace, Traced};

/// Defines a new enum of API errors, each variant mapped onto an [`Error`]
/// with its `code`, HTTP `status` and `message`.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl $name {
            /// Returns the code of this error.
            pub const fn code(self) -> $crate::error::Code {
                match self {
                    $( Self::$variant => $code, )*
                }
            }

            /// Returns the HTTP status code of this error.
            pub const fn status_code(self) -> ::http::StatusCode {
                match self {
                    $( Self::$variant => ::http::StatusCode::$status_code, )*
                }
            }
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                Self::new(err.code(), err.status_code(), &err)
            }
        }
    };
}

/// GraphQL API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// Machine-readable [`Code`] of this [`Error`].
    pub code: Code,

    /// [`http::StatusCode`] the response is sent with.
    pub status_code: http::StatusCode,

    /// [`Trace`] of the failed operation, if it was traced.
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// Human-readable message.
    pub message: String,
}

impl Error {
    /// Creates a new untraced [`Error`].
    #[must_use]
    pub fn new(
        code: Code,
        status_code: http::StatusCode,
        message: &impl ToString,
    ) -> Self {
        Self {
            code,
            status_code,
            backtrace: None,
            message: message.to_string(),
        }
    }

    /// Creates a new [`Error`] hiding an unexpected failure.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self::new(
            "INTERNAL_SERVER_ERROR",
            http::StatusCode::INTERNAL_SERVER_ERROR,
            msg,
        )
    }

    /// Returns the frames of the [`Trace`] of this [`Error`], if any.
    fn frames(&self) -> impl Iterator<Item = String> + '_ {
        self.backtrace
            .iter()
            .flat_map(|trace| trace.iter())
            .map(ToString::to_string)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.code, self.message)?;
        if self.backtrace.is_some() {
            write!(f, "\n{}", self.frames().join("\n"))?;
        }
        Ok(())
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let mut ext = juniper::Object::with_capacity(2);
        _ = ext.add_field("code", juniper::Value::scalar(self.code.to_owned()));
        if self.backtrace.is_some() {
            let frames = self.frames().map(juniper::Value::scalar).collect();
            _ = ext.add_field("backtrace", juniper::Value::list(frames));
        }
        juniper::FieldError::new(self.message, juniper::Value::object(ext))
    }
}

/// Machine-readable code of an [`Error`], e.g. `BOOKING_NOT_EXISTS`.
pub type Code = &'static str;

/// Conversion of failures into API [`Error`]s.
pub trait AsError {
    /// Converts this failure into an [`Error`] if it's meaningful to a
    /// client.
    ///
    /// [`None`] means an internal failure.
    fn try_as_error(&self) -> Option<Error>;

    /// Converts this failure into an [`Error`], hiding internal ones.
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Same as [`AsError::as_error()`], but consumes this failure.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let error = self.as_ref().try_as_error()?;
        Some(Error {
            backtrace: Some(self.trace().clone()),
            ..error
        })
    }
}

impl AsError for TypedHeaderRejection {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::new(
            "INVALID_AUTHORIZATION_HEADER",
            http::StatusCode::BAD_REQUEST,
            self,
        ))
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

#[cfg(test)]
mod spec {
    use std::fmt;

    use juniper::{DefaultScalarValue, IntoFieldError as _};

    use super::{AsError, Error};

    define_error! {
        enum TestError {
            #[code = "SPOT_NOT_EXISTS"]
            #[status = NOT_FOUND]
            #[message = "`Spot` with the specified ID does not exist"]
            NotExists,
        }
    }

    #[test]
    fn defined_error_carries_code_and_status() {
        let err = Error::from(TestError::NotExists);

        assert_eq!(err.code, "SPOT_NOT_EXISTS");
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
        assert_eq!(
            err.to_string(),
            "[SPOT_NOT_EXISTS]: `Spot` with the specified ID does not exist",
        );
    }

    #[test]
    fn field_error_exposes_code() {
        let err: juniper::FieldError<DefaultScalarValue> =
            Error::from(TestError::NotExists).into_field_error();

        let code = err
            .extensions()
            .as_object_value()
            .and_then(|o| o.get_field_value("code"))
            .and_then(|v| v.as_string_value());
        assert_eq!(code, Some("SPOT_NOT_EXISTS"));
        assert!(err
            .extensions()
            .as_object_value()
            .and_then(|o| o.get_field_value("backtrace"))
            .is_none());
    }

    #[test]
    fn unknown_errors_are_internal() {
        struct Opaque;

        impl fmt::Display for Opaque {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("opaque")
            }
        }

        impl AsError for Opaque {
            fn try_as_error(&self) -> Option<Error> {
                None
            }
        }

        let err = Opaque.into_error();

        assert_eq!(err.code, "INTERNAL_SERVER_ERROR");
        assert_eq!(
            err.status_code,
            http::StatusCode::INTERNAL_SERVER_ERROR,
        );
    }
}
