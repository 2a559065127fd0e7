//! [`Command`] for authorizing a [`Session`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`Session`] by its [`session::Token`].
///
/// Succeeds only for unexpired [`Session`]s of existing [`User`]s.
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db> Command<AuthorizeUserSession> for Service<Db>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let session = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config.jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        let user = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(session.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if user.is_none() {
            return Err(tracerr::new!(E::UserNotExists(session.user_id)));
        }

        Ok(session)
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`jsonwebtoken`] decoding error, including an expired [`Session`].
    #[display("Failed to decode a JSON Web Token: {_0}")]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),

    /// [`User`] the [`Session`] belongs to does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    UserNotExists(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use crate::{
        command::CreateUserSession,
        domain::user::{self, session, Session},
        test_support, Command as _,
    };

    use super::{AuthorizeUserSession, ExecutionError};

    fn sign(secret: &[u8], session: &Session) -> session::Token {
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            session,
            &jsonwebtoken::EncodingKey::from_secret(secret),
        )
        .unwrap();
        token.parse().unwrap()
    }

    #[tokio::test]
    async fn authorizes_issued_token() {
        let svc = test_support::service();
        let user = test_support::create_user(&svc, "jane@example.com").await;
        let issued = svc
            .execute(CreateUserSession::ByUserId(user.id))
            .await
            .unwrap();

        let session = svc
            .execute(AuthorizeUserSession {
                token: issued.token,
            })
            .await
            .unwrap();

        assert_eq!(session.user_id, user.id);
        assert_eq!(
            session.expires_at.unix_timestamp(),
            issued.expires_at.unix_timestamp(),
        );
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let svc = test_support::service();
        let user = test_support::create_user(&svc, "jane@example.com").await;
        let token = sign(
            b"test-secret",
            &Session {
                user_id: user.id,
                expires_at: (DateTime::now() - Duration::from_secs(3600))
                    .coerce(),
            },
        );

        let err = svc.execute(AuthorizeUserSession { token }).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }

    #[tokio::test]
    async fn rejects_foreign_signature() {
        let svc = test_support::service();
        let user = test_support::create_user(&svc, "jane@example.com").await;
        let token = sign(
            b"another-secret",
            &Session {
                user_id: user.id,
                expires_at: (DateTime::now() + Duration::from_secs(3600))
                    .coerce(),
            },
        );

        let err = svc.execute(AuthorizeUserSession { token }).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
    }

    #[tokio::test]
    async fn rejects_unknown_user() {
        let svc = test_support::service();
        let token = sign(
            b"test-secret",
            &Session {
                user_id: user::Id::new(),
                expires_at: (DateTime::now() + Duration::from_secs(3600))
                    .coerce(),
            },
        );

        let err = svc.execute(AuthorizeUserSession { token }).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::UserNotExists(_)));
    }
}
