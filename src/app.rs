use std::net::SocketAddr;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth, plans, profiles, state::AppState, status};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(status::router())
                .merge(auth::router())
                .merge(profiles::router())
                .merge(plans::router()),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{auth::jwt::JwtKeys, profiles::AccountType};

    fn access_token(state: &AppState, role: AccountType) -> String {
        JwtKeys::from(&state.config.jwt)
            .issue_pair(uuid::Uuid::new_v4(), role)
            .unwrap()
            .access_token
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn profile_requires_token() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::get("/api/v1/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_token_cannot_authenticate() {
        let state = AppState::fake();
        let keys = crate::auth::jwt::JwtKeys::from(&state.config.jwt);
        let refresh = keys
            .issue_pair(uuid::Uuid::new_v4(), AccountType::User)
            .unwrap()
            .refresh_token;
        let app = build_app(state);
        let res = app
            .oneshot(
                Request::get("/api/v1/plans/mine")
                    .header("authorization", format!("Bearer {refresh}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_plan_id_is_rejected() {
        let state = AppState::fake();
        let keys = crate::auth::jwt::JwtKeys::from(&state.config.jwt);
        let access = keys
            .issue_pair(uuid::Uuid::new_v4(), AccountType::User)
            .unwrap()
            .access_token;
        let app = build_app(state);
        let res = app
            .oneshot(
                Request::get("/api/v1/plans/not-a-uuid")
                    .header("authorization", format!("Bearer {access}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn end_users_cannot_reach_review_routes() {
        let state = AppState::fake();
        let token = access_token(&state, AccountType::User);
        let app = build_app(state);

        for (method, uri, body) in [
            ("GET", "/api/v1/plans/pending", ""),
            ("GET", "/api/v1/plans/dashboard", ""),
            (
                "POST",
                "/api/v1/plans/6f1c8e9a-3a57-4c36-9d0e-2f7f0b7f0c11/validate",
                r#"{"action":"approve"}"#,
            ),
        ] {
            let res = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .header("authorization", format!("Bearer {token}"))
                        .header("content-type", "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::FORBIDDEN, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn unknown_review_action_is_a_validation_error() {
        let state = AppState::fake();
        let token = access_token(&state, AccountType::Nutritionist);
        let app = build_app(state);
        let res = app
            .oneshot(
                Request::post("/api/v1/plans/6f1c8e9a-3a57-4c36-9d0e-2f7f0b7f0c11/validate")
                    .header("authorization", format!("Bearer {token}"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"action":"maybe"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
