mod common;

use anyhow::Result;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use dashboard_auth::{TokenCodec, TokenKind};

use common::{
    assert_auth_error, spawn_app, spawn_app_with_broken_store, spawn_app_with_codec, spawn_app_with_panicking_store,
};

#[tokio::test]
async fn issued_access_token_authenticates_subject() -> Result<()> {
    let app = spawn_app();
    let pair = app.state.issuer.issue("u1")?;

    let res = app.whoami(Some(&format!("Bearer {}", pair.access_token))).await?;

    assert_eq!(res.status, StatusCode::OK, "body: {}", res.body);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["data"]["id"], "u1");
    assert_eq!(res.body["data"]["isActive"], true);
    assert!(res.body["data"].get("passwordHash").is_none());
    assert!(res.body["data"].get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn missing_authorization_header_is_no_token() -> Result<()> {
    let app = spawn_app();
    let res = app.whoami(None).await?;
    assert_auth_error(&res, StatusCode::UNAUTHORIZED, "NO_TOKEN");
    Ok(())
}

#[tokio::test]
async fn non_bearer_or_empty_credentials_are_no_token() -> Result<()> {
    let app = spawn_app();
    let token = app.mint("u1", TokenKind::Access);

    for header in [format!("Basic {token}"), "Bearer ".to_string(), token.clone()] {
        let res = app.whoami(Some(&header)).await?;
        assert_auth_error(&res, StatusCode::UNAUTHORIZED, "NO_TOKEN");
    }
    Ok(())
}

#[tokio::test]
async fn expired_access_token_is_token_expired() -> Result<()> {
    let app = spawn_app();
    let token = app.mint_at("u1", TokenKind::Access, Utc::now() - Duration::minutes(16));

    let res = app.whoami(Some(&format!("Bearer {token}"))).await?;
    assert_auth_error(&res, StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED");
    Ok(())
}

#[tokio::test]
async fn forged_or_garbage_token_is_invalid_token() -> Result<()> {
    let app = spawn_app();
    let foreign = TokenCodec::new(b"attacker", b"attacker").encode("u1", TokenKind::Access, Duration::minutes(5))?;

    for token in [foreign.as_str(), "not-a-jwt", "a.b.c"] {
        let res = app.whoami(Some(&format!("Bearer {token}"))).await?;
        assert_auth_error(&res, StatusCode::UNAUTHORIZED, "INVALID_TOKEN");
    }
    Ok(())
}

#[tokio::test]
async fn refresh_token_as_bearer_is_invalid_token_type() -> Result<()> {
    // Distinct refresh secret
    let app = spawn_app();
    let pair = app.state.issuer.issue("u1")?;
    let res = app.whoami(Some(&format!("Bearer {}", pair.refresh_token))).await?;
    assert_auth_error(&res, StatusCode::UNAUTHORIZED, "INVALID_TOKEN_TYPE");

    // Shared secret
    let app = spawn_app_with_codec(TokenCodec::new(b"shared", b"shared"));
    let pair = app.state.issuer.issue("u1")?;
    let res = app.whoami(Some(&format!("Bearer {}", pair.refresh_token))).await?;
    assert_auth_error(&res, StatusCode::UNAUTHORIZED, "INVALID_TOKEN_TYPE");
    Ok(())
}

#[tokio::test]
async fn deactivated_subject_is_user_not_found() -> Result<()> {
    let app = spawn_app();
    let token = app.mint("u2", TokenKind::Access);

    let res = app.whoami(Some(&format!("Bearer {token}"))).await?;
    assert_auth_error(&res, StatusCode::UNAUTHORIZED, "USER_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn unknown_subject_is_user_not_found() -> Result<()> {
    let app = spawn_app();
    let token = app.mint("ghost", TokenKind::Access);

    let res = app.whoami(Some(&format!("Bearer {token}"))).await?;
    assert_auth_error(&res, StatusCode::UNAUTHORIZED, "USER_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn subject_state_is_rechecked_on_every_request() -> Result<()> {
    let app = spawn_app();
    let bearer = format!("Bearer {}", app.mint("u1", TokenKind::Access));

    assert_eq!(app.whoami(Some(&bearer)).await?.status, StatusCode::OK);

    app.users.set_active("u1", false).await;
    let res = app.whoami(Some(&bearer)).await?;
    assert_auth_error(&res, StatusCode::UNAUTHORIZED, "USER_NOT_FOUND");

    app.users.set_active("u1", true).await;
    assert_eq!(app.whoami(Some(&bearer)).await?.status, StatusCode::OK);

    app.users.remove("u1").await;
    let res = app.whoami(Some(&bearer)).await?;
    assert_auth_error(&res, StatusCode::UNAUTHORIZED, "USER_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn store_failure_is_auth_error_without_detail() -> Result<()> {
    let app = spawn_app_with_broken_store();
    let token = app.mint("u1", TokenKind::Access);

    let res = app.whoami(Some(&format!("Bearer {token}"))).await?;
    assert_auth_error(&res, StatusCode::INTERNAL_SERVER_ERROR, "AUTH_ERROR");
    assert!(!res.body.to_string().contains("db-primary"));
    Ok(())
}

#[tokio::test]
async fn panicking_store_is_auth_error() -> Result<()> {
    let app = spawn_app_with_panicking_store();
    let token = app.mint("u1", TokenKind::Access);

    let res = app.whoami(Some(&format!("Bearer {token}"))).await?;
    assert_auth_error(&res, StatusCode::INTERNAL_SERVER_ERROR, "AUTH_ERROR");
    assert!(!res.body.to_string().contains("driver bug"));
    Ok(())
}

#[tokio::test]
async fn concurrent_requests_with_the_same_token_agree() -> Result<()> {
    let app = spawn_app();
    let bearer = format!("Bearer {}", app.mint("u1", TokenKind::Access));

    let (first, second) = tokio::join!(app.whoami(Some(&bearer)), app.whoami(Some(&bearer)));
    assert_eq!(first?.status, StatusCode::OK);
    assert_eq!(second?.status, StatusCode::OK);
    Ok(())
}
