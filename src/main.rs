use std::sync::Arc;

use axum_extra::extract::cookie::Key;
use foglio::{
    application::{
        admin::posts::AdminPostService,
        auth::AdminAuth,
        error::AppError,
        feed::FeedService,
        repos::{PostsRepo, PostsWriteRepo},
    },
    config,
    infra::{
        db::SqliteRepositories,
        http::{self, AppState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        std::process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let pool = SqliteRepositories::connect(
        &settings.database.path,
        settings.database.max_connections.get(),
    )
    .await
    .map_err(AppError::from)?;

    SqliteRepositories::run_migrations(&pool)
        .await
        .map_err(AppError::from)?;

    info!(
        target = "foglio::startup",
        database = %settings.database.path.display(),
        "database ready"
    );

    let repositories = Arc::new(SqliteRepositories::new(pool));
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();

    let cookie_key = match settings.admin.session_secret.as_ref() {
        Some(secret) => Key::derive_from(secret.as_bytes()),
        None => Key::generate(),
    };

    let state = AppState {
        feed: Arc::new(FeedService::new(posts_repo.clone())),
        posts: Arc::new(AdminPostService::new(posts_repo, posts_write_repo)),
        auth: Arc::new(AdminAuth::new(
            settings.admin.username.clone(),
            settings.admin.password.clone(),
        )),
        db: repositories,
        cookie_key,
    };

    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(foglio::infra::error::InfraError::Io(err)))?;

    info!(
        target = "foglio::startup",
        addr = %settings.server.addr,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
