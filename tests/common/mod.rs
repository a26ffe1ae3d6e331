//! 集成测试工具
//!
//! 每个测试用例拿到独立的临时 SQLite 数据库和内存中的完整路由，
//! 通过 `tower::ServiceExt::oneshot` 直接驱动，无需监听端口。
#![allow(dead_code)]

use axum::{Router, body::Body};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use reef_server::auth::JwtConfig;
use reef_server::{Config, ServerState};

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
    _db_dir: tempfile::TempDir,
}

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// 默认限流配置 (足够宽松，不干扰普通用例)
pub async fn spawn_app() -> TestApp {
    spawn_app_with_limits(1000, 60_000).await
}

/// 指定限流窗口的测试应用
pub async fn spawn_app_with_limits(max_requests: usize, window_ms: i64) -> TestApp {
    let db_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = db_dir.path().join("test.db");

    let config = Config {
        database_url: format!("sqlite:{}", db_path.display()),
        http_port: 0,
        environment: "development".to_string(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiration_minutes: 60,
            issuer: "reef-server".to_string(),
        },
        rate_limit_max_requests: max_requests,
        rate_limit_window_ms: window_ms,
        log_dir: None,
    };

    let state = ServerState::initialize(&config)
        .await
        .expect("Failed to initialize server state");
    let router = reef_server::api::router(&state).with_state(state.clone());

    TestApp {
        router,
        state,
        _db_dir: db_dir,
    }
}

impl TestApp {
    /// 发送一个请求，返回 (状态码, 响应 JSON)
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response is not JSON")
        };

        (status, json)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", path, token, Some(body)).await
    }

    pub async fn put(
        &self,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request("PUT", path, token, body).await
    }

    /// 注册顾客账户，返回 (token, account_id)
    pub async fn register_user(&self, username: &str) -> (String, String) {
        let (status, body) = self
            .post(
                "/api/user/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "correct-horse-battery",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        extract_auth(&body)
    }

    /// 注册后台账户 (admin 角色)，返回 (token, account_id)
    pub async fn register_admin(&self, username: &str) -> (String, String) {
        let (status, body) = self
            .post(
                "/api/admin/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "correct-horse-battery",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "admin register failed: {body}");
        extract_auth(&body)
    }

    /// 把账户直接提升为 super_admin (无公开接口，直写数据库)
    pub async fn promote_to_super_admin(&self, account_id: &str) {
        sqlx::query("UPDATE accounts SET role = 'super_admin' WHERE id = ?")
            .bind(account_id)
            .execute(&self.state.pool)
            .await
            .expect("Failed to promote account");
    }

    /// 停用账户
    pub async fn deactivate_account(&self, account_id: &str) {
        sqlx::query("UPDATE accounts SET is_active = 0 WHERE id = ?")
            .bind(account_id)
            .execute(&self.state.pool)
            .await
            .expect("Failed to deactivate account");
    }
}

fn extract_auth(body: &Value) -> (String, String) {
    let token = body["data"]["token"]
        .as_str()
        .expect("missing token")
        .to_string();
    let account_id = body["data"]["account"]["id"]
        .as_str()
        .expect("missing account id")
        .to_string();
    (token, account_id)
}

/// 一个合法的堂食下单请求体
pub fn dine_in_order(customer: &str) -> Value {
    json!({
        "items": [
            {"id": "m1", "name": "Pad Thai", "price": 12.5, "quantity": 2},
            {"id": "m2", "name": "Spring Rolls", "price": 4.0, "quantity": 3},
        ],
        "order_type": "dine_in",
        "table_number": "7",
        "customer_name": customer,
    })
}
