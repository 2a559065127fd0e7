//! [`User`]-related REST API definitions.

use axum::{
    extract::rejection::JsonRejection, http::StatusCode, Extension, Json,
};
use common::DateTime;
use derive_more::Debug;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{self, user},
    query, Query as _,
};

use crate::{define_error, session, AsError, Error, Service, Session};

/// Registered user.
#[derive(Clone, Debug, Serialize)]
pub struct User {
    /// ID of this [`User`].
    pub id: user::Id,

    /// Email address of this [`User`].
    pub email: String,

    /// Name of this [`User`].
    pub name: String,

    /// [`DateTime`] when this [`User`] was registered.
    pub created_at: DateTime,
}

impl From<domain::User> for User {
    fn from(user: domain::User) -> Self {
        let domain::User {
            id,
            name,
            email,
            password_hash: _,
            created_at,
        } = user;

        Self {
            id,
            email: email.into(),
            name: name.into(),
            created_at: created_at.coerce(),
        }
    }
}

/// Issued [`Session`] along with its [`User`].
#[derive(Clone, Debug, Serialize)]
pub struct SessionResponse {
    /// Bearer token of the issued [`Session`].
    pub token: String,

    /// [`DateTime`] when the issued [`Session`] expires.
    pub expires_at: DateTime,

    /// [`User`] the [`Session`] is issued for.
    pub user: User,
}

impl From<command::create_user_session::Output> for SessionResponse {
    fn from(out: command::create_user_session::Output) -> Self {
        let command::create_user_session::Output {
            token,
            user,
            expires_at,
        } = out;

        Self {
            token: token.to_string(),
            expires_at: expires_at.coerce(),
            user: user.into(),
        }
    }
}

/// Request body of the [`register`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct RegisterRequest {
    /// Email address of a new [`User`].
    pub email: String,

    /// Password of a new [`User`].
    #[debug(skip)]
    pub password: String,

    /// Name of a new [`User`].
    pub name: String,
}

/// Registers a new [`User`] and issues a [`Session`] for it.
///
/// # Errors
///
/// If the provided data is invalid, the email is occupied, or the [`Service`]
/// fails.
#[tracing::instrument(skip_all)]
pub async fn register(
    Extension(service): Extension<Service>,
    req: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), Error> {
    let Json(RegisterRequest {
        email,
        password,
        name,
    }) = req.map_err(AsError::into_error)?;

    let email =
        user::Email::new(email).ok_or(RegistrationError::InvalidEmail)?;
    let password = user::Password::new(password)
        .ok_or(RegistrationError::InvalidPassword)?;
    let name =
        user::Name::new(name.trim()).ok_or(RegistrationError::InvalidName)?;

    let user = service
        .execute(command::CreateUser {
            name,
            email,
            password: SecretBox::new(Box::new(password)),
        })
        .await
        .map_err(AsError::into_error)?;

    let session = service
        .execute(command::CreateUserSession::ByUserId(user.id))
        .await
        .map_err(AsError::into_error)?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Request body of the [`login`] handler.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address of a [`User`].
    pub email: String,

    /// Password of a [`User`].
    #[debug(skip)]
    pub password: String,
}

/// Issues a new [`Session`] for the [`User`] with the provided credentials.
///
/// # Errors
///
/// If the credentials are wrong, or the [`Service`] fails.
#[tracing::instrument(skip_all)]
pub async fn login(
    Extension(service): Extension<Service>,
    req: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, Error> {
    let Json(LoginRequest { email, password }) =
        req.map_err(AsError::into_error)?;

    let (Some(email), Some(password)) =
        (user::Email::new(email), user::Password::new(password))
    else {
        return Err(LoginError::WrongCredentials.into());
    };

    let session = service
        .execute(command::CreateUserSession::ByCredentials {
            email,
            password: SecretBox::new(Box::new(password)),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(session.into()))
}

/// Returns the [`User`] of the current [`Session`].
///
/// # Errors
///
/// If the [`User`] doesn't exist anymore, or the [`Service`] fails.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
pub async fn me(
    session: Session,
    Extension(service): Extension<Service>,
) -> Result<Json<User>, Error> {
    service
        .execute(query::user::ById::by(session.user_id))
        .await
        .map_err(AsError::into_error)?
        .map(|u| Json(u.into()))
        .ok_or_else(|| session::AuthError::AuthorizationRequired.into())
}

define_error! {
    enum RegistrationError {
        #[code = "INVALID_EMAIL"]
        #[status = BAD_REQUEST]
        #[message = "Invalid email address"]
        InvalidEmail,

        #[code = "INVALID_PASSWORD"]
        #[status = BAD_REQUEST]
        #[message = "Password must be from 6 to 128 characters long"]
        InvalidPassword,

        #[code = "INVALID_NAME"]
        #[status = BAD_REQUEST]
        #[message = "Name must not be empty"]
        InvalidName,
    }
}

define_error! {
    enum LoginError {
        #[code = "WRONG_CREDENTIALS"]
        #[status = FORBIDDEN]
        #[message = "Invalid credentials"]
        WrongCredentials,
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMAIL_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "Email is already registered"]
                EmailOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(Error::EmailOccupied.into()),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::UserNotExists(_) | Self::WrongCredentials => {
                Some(LoginError::WrongCredentials.into())
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use service::{
        command::{create_user, create_user_session},
        domain::{self, user},
    };

    use crate::AsError as _;

    use super::User;

    #[test]
    fn maps_command_errors() {
        let err = create_user::ExecutionError::EmailOccupied(
            user::Email::new("jane@example.com").unwrap(),
        )
        .as_error();
        assert_eq!(err.code, "EMAIL_OCCUPIED");
        assert_eq!(err.status_code, http::StatusCode::CONFLICT);

        let err = create_user_session::ExecutionError::WrongCredentials
            .as_error();
        assert_eq!(err.code, "WRONG_CREDENTIALS");
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn never_serializes_password_hash() {
        let user = User::from(domain::User {
            id: user::Id::new(),
            name: user::Name::new("Jane Doe").unwrap(),
            email: user::Email::new("jane@example.com").unwrap(),
            password_hash: user::PasswordHash::new(&secrecy::SecretBox::new(
                Box::new(user::Password::new("correct horse").unwrap()),
            )),
            created_at: DateTime::now().coerce(),
        });

        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["email"], "jane@example.com");
        assert_eq!(json["name"], "Jane Doe");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }
}
