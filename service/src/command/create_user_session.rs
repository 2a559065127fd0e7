//! [`Command`] for creating a [`Session`].

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::SecretBox;
use tracerr::Traced;

#[cfg(doc)]
use crate::{
    domain::user::{session::Token, Email, Password},
    Config,
};
use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`].
///
/// Created [`Session`]s expire after [`Config::session_ttl`].
#[derive(Clone, Debug, From)]
pub enum CreateUserSession {
    /// Create a new [`Session`] by [`User`] credentials.
    ByCredentials {
        /// [`Email`] of a [`User`].
        email: user::Email,

        /// [`Password`] of a [`User`].
        password: SecretBox<user::Password>,
    },

    /// Create a new [`Session`] by [`User`] ID.
    ByUserId(user::Id),
}

/// Output of [`CreateUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// [`User`] whose [`Session`] has been created.
    pub user: User,

    /// [`DateTime`] when the [`Session`] expires.
    pub expires_at: session::ExpirationDateTime,
}

impl<Db> Command<CreateUserSession> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + for<'l> Database<
            Select<By<Option<User>, &'l user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use CreateUserSession as Cmd;
        use ExecutionError as E;

        let user = match cmd {
            Cmd::ByCredentials { email, password } => {
                let user = self
                    .database()
                    .execute(Select(By::new(&email)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::WrongCredentials)
                    .map_err(tracerr::wrap!())?;

                if !user.password_hash.verify(&password) {
                    return Err(tracerr::new!(E::WrongCredentials));
                }

                user
            }
            Cmd::ByUserId(user_id) => self
                .database()
                .execute(Select(By::new(user_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::UserNotExists(user_id))
                .map_err(tracerr::wrap!())?,
        };

        let expires_at = (DateTime::now() + self.config.session_ttl).coerce();
        let token = jsonwebtoken::encode::<Session>(
            &jsonwebtoken::Header::default(),
            &Session {
                user_id: user.id,
                expires_at,
            },
            &self.config.jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        tracing::debug!(
            user_id = %user.id,
            expires_at = %expires_at.to_rfc3339(),
            "session created",
        );

        Ok(Output {
            token,
            user,
            expires_at,
        })
    }
}

/// Error of [`CreateUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`CreateUserSession::ByCredentials`] contains wrong credentials.
    #[display("Wrong `User` credentials")]
    WrongCredentials,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;
    use secrecy::SecretBox;

    use crate::{domain::user, test_support, Command as _};

    use super::{CreateUserSession, ExecutionError};

    fn password(s: &str) -> SecretBox<user::Password> {
        SecretBox::init_with(|| user::Password::new(s).unwrap())
    }

    #[tokio::test]
    async fn creates_by_credentials() {
        let svc = test_support::service();
        let user = test_support::create_user(&svc, "jane@example.com").await;

        let out = svc
            .execute(CreateUserSession::ByCredentials {
                email: user::Email::new("jane@example.com").unwrap(),
                password: password("correct horse"),
            })
            .await
            .unwrap();

        assert_eq!(out.user.id, user.id);
        let ttl = out.expires_at.coerce::<()>() - DateTime::now();
        assert!(ttl <= Duration::from_secs(30 * 60), "TTL is {ttl:?}");
        assert!(ttl > Duration::from_secs(29 * 60), "TTL is {ttl:?}");
    }

    #[tokio::test]
    async fn creates_by_user_id() {
        let svc = test_support::service();
        let user = test_support::create_user(&svc, "jane@example.com").await;

        let out = svc.execute(CreateUserSession::ByUserId(user.id)).await.unwrap();

        assert_eq!(out.user.id, user.id);
        assert!(!AsRef::<str>::as_ref(&out.token).is_empty());
    }

    #[tokio::test]
    async fn fails_on_wrong_credentials() {
        let svc = test_support::service();
        drop(test_support::create_user(&svc, "jane@example.com").await);

        for (email, pass) in [
            ("jane@example.com", "wrong horse"),
            ("john@example.com", "correct horse"),
        ] {
            let err = svc
                .execute(CreateUserSession::ByCredentials {
                    email: user::Email::new(email).unwrap(),
                    password: password(pass),
                })
                .await
                .unwrap_err();

            assert!(
                matches!(err.as_ref(), ExecutionError::WrongCredentials),
                "unexpected error for `{email}`: {err}",
            );
        }
    }

    #[tokio::test]
    async fn fails_on_missing_user() {
        let svc = test_support::service();

        let err = svc
            .execute(CreateUserSession::ByUserId(user::Id::new()))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::UserNotExists(_)));
    }
}
