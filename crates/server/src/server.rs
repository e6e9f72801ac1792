use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{balances, expenses, groups, participants, personal, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let digest = engine::password_digest(auth_header.password());
    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::PasswordDigest.eq(digest))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub(crate) fn router(state: ServerState) -> Router {
    let public = Router::new()
        .route("/user/register", post(user::register))
        .route("/user/reset/request", post(user::reset_request))
        .route("/user/reset/confirm", post(user::reset_confirm))
        .with_state(state.clone());

    let authed = Router::new()
        .route("/user/me", get(user::me))
        .route("/user/password", post(user::password_update))
        .route("/groups", get(groups::list).post(groups::create))
        .route(
            "/groups/{group_id}",
            get(groups::detail)
                .patch(groups::update)
                .delete(groups::remove),
        )
        .route(
            "/groups/{group_id}/participants",
            get(participants::list).post(participants::create),
        )
        .route(
            "/groups/{group_id}/participants/{participant_id}/link",
            post(participants::link),
        )
        .route("/groups/{group_id}/balances", get(balances::list))
        .route(
            "/groups/{group_id}/expenses",
            get(expenses::list).post(expenses::create),
        )
        .route(
            "/groups/{group_id}/expenses/{expense_id}",
            get(expenses::detail)
                .patch(expenses::update)
                .delete(expenses::remove),
        )
        .route(
            "/personal/expenses",
            get(personal::list).post(personal::create),
        )
        .route("/personal/expenses/{expense_id}", delete(personal::remove))
        .route(
            "/personal/budget",
            get(personal::budget_get).put(personal::budget_set),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state);

    public.merge(authed)
}

/// Builds the full application router. Exposed for embedding and tests.
pub fn app(engine: Engine, db: DatabaseConnection) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        db,
    })
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}
