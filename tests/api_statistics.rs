//! 统计端点端到端测试

mod common;

use http::StatusCode;
use serde_json::{Value, json};

use common::spawn_app;

/// 下一个状态流转到 cancelled 的工具
async fn cancel_order(app: &common::TestApp, token: &str, order_id: &str) {
    let (status, _) = app
        .put(
            &format!("/api/user/orders/{order_id}/cancel"),
            Some(token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

async fn place_order(app: &common::TestApp, token: &str, items: Value) -> String {
    let (status, body) = app
        .post(
            "/api/user/orders",
            Some(token),
            json!({
                "items": items,
                "order_type": "dine_in",
                "table_number": "2",
                "customer_name": "Guest",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "order failed: {body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn dashboard_excludes_cancelled_revenue() {
    let app = spawn_app().await;
    let (admin_token, _) = app.register_admin("admin1").await;
    let (user_token, _) = app.register_user("alice").await;

    place_order(
        &app,
        &user_token,
        json!([{"id": "a", "name": "Pho", "price": 10.0, "quantity": 1}]),
    )
    .await;
    place_order(
        &app,
        &user_token,
        json!([{"id": "b", "name": "Laksa", "price": 30.0, "quantity": 1}]),
    )
    .await;
    let cancelled = place_order(
        &app,
        &user_token,
        json!([{"id": "c", "name": "Ramen", "price": 99.0, "quantity": 1}]),
    )
    .await;
    cancel_order(&app, &user_token, &cancelled).await;

    let (status, body) = app
        .get("/api/admin/dashboard/stats", Some(&admin_token))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order_count"], 3);
    assert_eq!(body["data"]["cancelled_count"], 1);
    assert_eq!(body["data"]["total_revenue"], 40.0);
    assert_eq!(body["data"]["average_order_value"], 20.0);
    assert_eq!(body["data"]["recent_orders"][0]["time_ago"], "just now");

    let breakdown = body["data"]["status_breakdown"].as_array().unwrap();
    let cancelled_bucket = breakdown
        .iter()
        .find(|b| b["status"] == "cancelled")
        .unwrap();
    assert_eq!(cancelled_bucket["count"], 1);
}

#[tokio::test]
async fn top_items_ranking_depends_on_rank_by() {
    let app = spawn_app().await;
    let (admin_token, _) = app.register_admin("admin2").await;
    let (user_token, _) = app.register_user("bob").await;

    // item1: 数量 3, 营收 15 - item2: 数量 5, 营收 5
    place_order(
        &app,
        &user_token,
        json!([{"id": "item1", "name": "Satay", "price": 5.0, "quantity": 3}]),
    )
    .await;
    place_order(
        &app,
        &user_token,
        json!([{"id": "item2", "name": "Rice", "price": 1.0, "quantity": 5}]),
    )
    .await;

    let (status, body) = app
        .get(
            "/api/admin/stats/top-items?rank_by=quantity",
            Some(&admin_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], "item2");
    assert_eq!(body["data"][0]["total_quantity"], 5);

    let (_, body) = app
        .get(
            "/api/admin/stats/top-items?rank_by=revenue",
            Some(&admin_token),
        )
        .await;
    assert_eq!(body["data"][0]["id"], "item1");
    assert_eq!(body["data"][0]["total_revenue"], 15.0);
}

#[tokio::test]
async fn top_items_limit_is_capped() {
    let app = spawn_app().await;
    let (admin_token, _) = app.register_admin("admin3").await;
    let (user_token, _) = app.register_user("carol").await;

    place_order(
        &app,
        &user_token,
        json!([{"id": "x", "name": "Pho", "price": 10.0, "quantity": 1}]),
    )
    .await;

    // limit 超出上限也只是截断，不报错
    let (status, body) = app
        .get(
            "/api/admin/stats/top-items?limit=9999",
            Some(&admin_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn analytics_groups_by_status_and_time() {
    let app = spawn_app().await;
    let (admin_token, _) = app.register_admin("admin4").await;
    let (user_token, _) = app.register_user("dave").await;

    place_order(
        &app,
        &user_token,
        json!([{"id": "a", "name": "Pho", "price": 10.0, "quantity": 1}]),
    )
    .await;
    place_order(
        &app,
        &user_token,
        json!([{"id": "a", "name": "Pho", "price": 10.0, "quantity": 2}]),
    )
    .await;

    let (status, body) = app
        .get(
            "/api/admin/analytics/orders?group_by=status",
            Some(&admin_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let buckets = body["data"].as_array().unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0]["key"], "pending");
    assert_eq!(buckets[0]["count"], 2);
    assert_eq!(buckets[0]["revenue"], 30.0);

    // 按天分桶 - 两单同一天落在一个桶里
    let (status, body) = app
        .get(
            "/api/admin/analytics/orders?group_by=time&granularity=day",
            Some(&admin_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let buckets = body["data"].as_array().unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0]["count"], 2);
}

#[tokio::test]
async fn analytics_rejects_out_of_range_window() {
    let app = spawn_app().await;
    let (admin_token, _) = app.register_admin("admin5").await;

    let (status, _) = app
        .get(
            "/api/admin/analytics/orders?days=0",
            Some(&admin_token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .get(
            "/api/admin/dashboard/stats?days=999",
            Some(&admin_token),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
