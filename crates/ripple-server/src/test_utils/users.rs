use axum::http::header;
use axum_test::TestServer;
use ripple_api_types::Sensitive;
use ripple_model::User;

use crate::{extract::SessionUser, App};

/// The credentials a freshly registered test user would keep on their
/// side, a simulation of what a client holds after sign up.
pub struct Credentials {
    pub user: User,
    pub password: String,
}

pub struct UserSessionData {
    pub user: User,
    pub password: String,
    /// User's login token
    pub token: String,
}

impl UserSessionData {
    /// Gets the [`SessionUser`] extractor.
    #[tracing::instrument(skip_all, name = "test_utils.users.get_session_user", fields(
        user.id = ?self.user.id,
        user.name = %self.user.name,
    ))]
    pub async fn get_session_user(&self, app: &App) -> SessionUser {
        SessionUser::from_db(&mut app.db_read().await.unwrap(), self.user.id)
            .await
            .unwrap()
    }
}

#[bon::builder]
#[tracing::instrument(skip(app, server), name = "test_utils.users.override_credentials")]
pub async fn override_credentials(
    app: &App,
    server: &mut TestServer,
    name: &str,
    email: Option<&str>,
) -> UserSessionData {
    let session = start_session()
        .app(app)
        .name(name)
        .maybe_email(email)
        .call()
        .await;

    server.add_header(header::AUTHORIZATION, format!("Bearer {}", session.token));
    session
}

#[bon::builder]
#[tracing::instrument(skip(app), name = "test_utils.users.start_session")]
pub async fn start_session(app: &App, name: &str, email: Option<&str>) -> UserSessionData {
    let credentials = register()
        .app(app)
        .name(name)
        .maybe_email(email)
        .call()
        .await;

    let request = crate::services::users::Login {
        name_or_email: Sensitive::new(name),
        password: Sensitive::new(&credentials.password),
    };

    let response = request.perform(app).await.unwrap();
    UserSessionData {
        user: response.user.user,
        password: credentials.password,
        token: response.token,
    }
}

#[bon::builder]
#[tracing::instrument(skip(app), name = "test_utils.users.register")]
pub async fn register(app: &App, name: &str, email: Option<&str>) -> Credentials {
    let password = format!("{name}-sikret-password-1");

    let request = crate::services::users::Register {
        name: Sensitive::new(name),
        email: email.map(Sensitive::new),
        password: Sensitive::new(&password),
    };

    let response = request.perform(app).await.unwrap();
    Credentials {
        user: response.user.user,
        password,
    }
}
