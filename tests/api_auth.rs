//! 认证与访问控制端到端测试

mod common;

use http::StatusCode;
use serde_json::json;

use common::spawn_app;
use reef_server::db::repository::AccountRepository;

#[tokio::test]
async fn register_returns_token_and_sanitized_account() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            "/api/user/register",
            None,
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "correct-horse-battery",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["data"]["account"]["role"], "user");
    // 密码哈希绝不能出现在响应里
    assert!(body["data"]["account"].get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_invalid_payload() {
    let app = spawn_app().await;

    let (status, _) = app
        .post(
            "/api/user/register",
            None,
            json!({"username": "ab", "email": "not-an-email", "password": "short"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = spawn_app().await;
    app.register_user("bob").await;

    let (status, body) = app
        .post(
            "/api/user/register",
            None,
            json!({
                "username": "bob",
                "email": "bob2@example.com",
                "password": "correct-horse-battery",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn login_failures_use_unified_message() {
    let app = spawn_app().await;
    app.register_user("carol").await;

    // 密码错误
    let (status, body) = app
        .post(
            "/api/user/login",
            None,
            json!({"username": "carol", "password": "wrong-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let wrong_password_msg = body["message"].as_str().unwrap().to_string();

    // 用户不存在 - 必须与密码错误返回完全相同的文案
    let (status, body) = app
        .post(
            "/api/user/login",
            None,
            json!({"username": "no-such-user", "password": "wrong-password"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"].as_str().unwrap(), wrong_password_msg);
}

#[tokio::test]
async fn me_returns_current_identity() {
    let app = spawn_app().await;
    let (token, account_id) = app.register_user("dave").await;

    let (status, body) = app.get("/api/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], account_id.as_str());
    assert_eq!(body["data"]["username"], "dave");
}

#[tokio::test]
async fn missing_and_malformed_tokens_are_unauthorized() {
    let app = spawn_app().await;

    let (status, _) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/me", Some("not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let app = spawn_app().await;
    let (_, account_id) = app.register_user("erin").await;

    let account = AccountRepository::new(app.state.pool.clone())
        .find_by_id(&account_id)
        .await
        .unwrap()
        .unwrap();
    let expired = app
        .state
        .jwt_service
        .generate_token_with_expiration(&account, -5)
        .unwrap();

    let (status, body) = app.get("/api/auth/me", Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn deactivated_account_is_rejected_despite_valid_token() {
    let app = spawn_app().await;
    let (token, account_id) = app.register_user("frank").await;

    app.deactivate_account(&account_id).await;

    let (status, _) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 停用后登录也被拒绝
    let (status, _) = app
        .post(
            "/api/user/login",
            None,
            json!({"username": "frank", "password": "correct-horse-battery"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_portal_rejects_customer_accounts() {
    let app = spawn_app().await;
    app.register_user("grace").await;

    let (status, _) = app
        .post(
            "/api/admin/login",
            None,
            json!({"username": "grace", "password": "correct-horse-battery"}),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn customer_cannot_reach_admin_endpoints() {
    let app = spawn_app().await;
    let (token, _) = app.register_user("heidi").await;

    let (status, _) = app.get("/api/admin/orders", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/admin/dashboard/stats", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn menu_delete_requires_super_admin() {
    let app = spawn_app().await;
    let (admin_token, admin_id) = app.register_admin("ivan").await;

    let (status, body) = app
        .post(
            "/api/admin/menu-items",
            Some(&admin_token),
            json!({"name": "Laksa", "price": 9.5, "category": "mains"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let item_id = body["data"]["id"].as_str().unwrap().to_string();

    // 普通 admin 无法删除
    let (status, _) = app
        .request(
            "DELETE",
            &format!("/api/admin/menu-items/{item_id}"),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 提升为 super_admin 后可以删除 (角色取自数据库而非令牌)
    app.promote_to_super_admin(&admin_id).await;
    let (status, _) = app
        .request(
            "DELETE",
            &format!("/api/admin/menu-items/{item_id}"),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_needs_no_auth() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}
