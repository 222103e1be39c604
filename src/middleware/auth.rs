/*
 * Responsibility
 * - authenticate: Bearer header extraction -> token validation -> claims
 *   stored on the request context
 * - authorize: role-membership enforcement over the stored claims
 */
use std::sync::Arc;

use axum::http::header;

use crate::auth::{Auth, Role};
use crate::error::AppError;
use crate::web::{Handler, Middleware};

/// Validate the `Authorization: Bearer <token>` header and attach the token's
/// claims to the request context. Any failure is a 401; the header check
/// happens before validation is even attempted.
pub fn authenticate(auth: Arc<Auth>) -> Middleware {
    Arc::new(move |next: Handler| -> Handler {
        let auth = auth.clone();
        Arc::new(move |ctx, req| {
            let next = next.clone();
            let auth = auth.clone();
            Box::pin(async move {
                let header_value = req
                    .headers()
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();

                let parts: Vec<&str> = header_value.split_whitespace().collect();
                if parts.len() != 2 || !parts[0].eq_ignore_ascii_case("bearer") {
                    return Err(AppError::Authentication(
                        "expected authorization header format: Bearer <token>".to_string(),
                    ));
                }

                let claims = auth
                    .validate_token(parts[1])
                    .map_err(|err| AppError::Authentication(err.to_string()))?;

                ctx.set_claims(claims);

                next(ctx, req).await
            })
        })
    })
}

/// Enforce that the authenticated claims carry at least one of `roles`.
/// Must run after [`authenticate`]; missing claims are a 403 rather than a
/// panic so a miswired route fails closed.
pub fn authorize(roles: Vec<Role>) -> Middleware {
    let roles = Arc::new(roles);
    Arc::new(move |next: Handler| -> Handler {
        let roles = roles.clone();
        Arc::new(move |ctx, req| {
            let next = next.clone();
            let roles = roles.clone();
            Box::pin(async move {
                let Some(claims) = ctx.claims() else {
                    return Err(AppError::Authorization(
                        "not authorized for that action, no claims".to_string(),
                    ));
                };

                if !claims.authorized(&roles) {
                    return Err(AppError::Authorization(format!(
                        "not authorized for that action, got {:?} want any of {:?}",
                        claims.roles, roles
                    )));
                }

                next(ctx.clone(), req).await
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::Request;
    use axum::http::StatusCode;
    use chrono::TimeDelta;

    use super::*;
    use crate::auth::Claims;
    use crate::keystore::{KeyStore, Keypair};
    use crate::web::{Context, handler, respond, wrap_middleware};

    const KEY_PEM: &str = include_str!("../../zarf/keys/private.pem");

    fn test_auth() -> Arc<Auth> {
        let ks = KeyStore::new();
        ks.add(Keypair::from_pem(KEY_PEM).unwrap(), "test");
        Arc::new(Auth::new("test", Arc::new(ks)).unwrap())
    }

    fn ok_handler() -> Handler {
        handler(|ctx, _req| async move {
            respond(&ctx, serde_json::json!({"status": "ok"}), StatusCode::OK)
        })
    }

    fn request_with_auth(value: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder();
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let chain = wrap_middleware(ok_handler(), &[authenticate(test_auth())]);
        let err = chain(Arc::new(Context::new()), request_with_auth(None))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.to_response().error,
            "expected authorization header format: Bearer <token>"
        );
    }

    #[tokio::test]
    async fn malformed_header_is_unauthenticated() {
        let chain = wrap_middleware(ok_handler(), &[authenticate(test_auth())]);
        for bad in ["Bearer", "Basic abc", "Bearer a b"] {
            let err = chain(Arc::new(Context::new()), request_with_auth(Some(bad)))
                .await
                .unwrap_err();
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn valid_token_attaches_claims() {
        let auth = test_auth();
        let claims = Claims::new("user-1", "warden", TimeDelta::hours(1), vec![Role::User]);
        let token = auth.issue_token(&claims).unwrap();

        let ctx = Arc::new(Context::new());
        let chain = wrap_middleware(ok_handler(), &[authenticate(auth)]);
        let res = chain(ctx.clone(), request_with_auth(Some(&format!("bearer {token}"))))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(ctx.claims().unwrap().sub, "user-1");
    }

    #[tokio::test]
    async fn authorize_without_claims_is_forbidden() {
        let chain = wrap_middleware(ok_handler(), &[authorize(vec![Role::Admin])]);
        let err = chain(Arc::new(Context::new()), request_with_auth(None))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn authorize_enforces_role_membership() {
        let ctx = Arc::new(Context::new());
        ctx.set_claims(Claims::new(
            "user-1",
            "warden",
            TimeDelta::hours(1),
            vec![Role::User],
        ));

        let admin_only = wrap_middleware(ok_handler(), &[authorize(vec![Role::Admin])]);
        let err = admin_only(ctx.clone(), request_with_auth(None))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        let either = wrap_middleware(ok_handler(), &[authorize(vec![Role::Admin, Role::User])]);
        let res = either(ctx, request_with_auth(None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
