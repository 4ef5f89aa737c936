//! [`Context`]-related definitions.

use std::sync::atomic::{self, AtomicU16};

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use juniper::{
    http::{GraphQLBatchResponse, GraphQLResponse},
    IntoFieldError as _,
};
use service::{
    command::{self, Command as _},
    domain::driver,
};
use tokio::sync::OnceCell;

use crate::{define_error, AsError, Error, JuniperResponse, Service};

/// Application context.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// Error status code.
    error_status_code: AtomicU16,

    /// Parts of the HTTP request.
    parts: http::request::Parts,

    /// Outcome of the request authentication, resolved once.
    session: OnceCell<Result<Option<Session>, Error>>,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the error status code of this [`Context`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn error_status_code(&self) -> http::StatusCode {
        http::StatusCode::from_u16(
            self.error_status_code.load(atomic::Ordering::Relaxed),
        )
        .expect("invalid status code")
    }

    /// Sets the error status code for this [`Context`].
    ///
    /// Provided [`http::StatusCode`] will be applied to the response.
    pub fn set_error_status_code(&self, status_code: http::StatusCode) {
        self.error_status_code
            .store(status_code.as_u16(), atomic::Ordering::Relaxed);
    }

    /// Helper method calling [`Context::set_error_status_code()`] inside
    /// [`Result::map_err()`] closure.
    pub fn error(&self) -> impl FnOnce(Error) -> Error + '_ {
        move |err| {
            self.set_error_status_code(err.status_code);
            err
        }
    }

    /// Tries to get the current [`Session`] for this [`Context`].
    ///
    /// Anonymous requests have no [`Session`].
    ///
    /// # Errors
    ///
    /// Errors if the provided authentication token is malformed or invalid.
    pub async fn try_current_session(&self) -> Result<Option<Session>, Error> {
        self.session
            .get_or_init(|| async {
                self.authenticate().await.map_err(self.error())
            })
            .await
            .clone()
    }

    /// Authenticates the bearer token of the current HTTP request, if any.
    async fn authenticate(&self) -> Result<Option<Session>, Error> {
        let header = self
            .parts
            .clone()
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await;
        let bearer = match header {
            Ok(TypedHeader(Authorization(bearer))) => bearer,
            Err(e) if e.is_missing() => return Ok(None),
            Err(e) => return Err(e.into_error()),
        };

        self.service
            .execute(command::AuthorizeSession {
                token: driver::Token::from(bearer.token().to_owned()),
            })
            .await
            .map(|s| {
                Some(Session {
                    driver_id: s.driver_id,
                })
            })
            .map_err(AsError::into_error)
    }
}

impl juniper::Context for Context {}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = JuniperResponse;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service =
            parts.extensions.get::<Service>().cloned().ok_or_else(|| {
                JuniperResponse {
                    status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
                    response: GraphQLBatchResponse::Single(
                        GraphQLResponse::error(
                            Error::internal(&"missing `Service` extension")
                                .into_field_error(),
                        ),
                    ),
                }
            })?;

        Ok(Self {
            service,
            error_status_code: AtomicU16::new(
                http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ),
            parts: parts.clone(),
            session: OnceCell::new(),
        })
    }
}

/// Authenticated driver of the current request.
#[derive(Clone, Copy, Debug)]
pub struct Session {
    /// ID of the authenticated driver.
    pub driver_id: driver::Id,
}

impl AsError for command::authorize_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::JsonWebTokenDecodeError(_) => {
                Some(AuthError::InvalidToken.into())
            }
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "INVALID_TOKEN"]
        #[status = UNAUTHORIZED]
        #[message = "Provided session token is invalid or expired"]
        InvalidToken,
    }
}
