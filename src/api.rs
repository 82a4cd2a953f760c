#![forbid(unsafe_code)]

use poem::Route;
use poem_openapi::OpenApiService;

use crate::api::root::RootApi;
use crate::api::users_get::GetUserApi;
use crate::api::users_list::ListUsersApi;
use crate::api::version::{VersionApi, SERVER_VERSION};

pub mod root;
pub mod users_get;
pub mod users_list;
pub mod version;

// ---------------------------------------------------------------------------
// make_app:
// ---------------------------------------------------------------------------
/** Assemble every endpoint plus the generated OpenAPI documents into one
 * route tree.  The server url only appears in the OpenAPI documents.
 */
pub fn make_app(title: &str, server_url: &str) -> Route {
    let endpoints = (RootApi, ListUsersApi, GetUserApi, VersionApi);
    let api_service =
        OpenApiService::new(endpoints, title, SERVER_VERSION.unwrap_or("unknown"))
            .server(server_url);

    // Allow the generated openapi specs to be retrieved from the server.
    let spec = api_service.spec_endpoint();
    let spec_yaml = api_service.spec_endpoint_yaml();
    let ui = api_service.swagger_ui();

    Route::new()
        .nest("/", api_service)
        .nest("/docs", ui)
        .at("/spec", spec)
        .at("/spec_yaml", spec_yaml)
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::make_app;
    use futures::future::join_all;
    use poem::http::StatusCode;
    use poem::test::TestClient;
    use serde_json::json;

    fn client() -> TestClient<poem::Route> {
        TestClient::new(make_app("Writer LLM Server", "http://localhost:8080"))
    }

    #[tokio::test]
    async fn root_says_hello_every_time() {
        let cli = client();
        for _ in 0..3 {
            let resp = cli.get("/").send().await;
            resp.assert_status_is_ok();
            resp.assert_content_type("application/json; charset=utf-8");
            resp.assert_json(json!({"message": "Hello, World!"})).await;
        }
    }

    #[tokio::test]
    async fn listing_is_fixed_and_ordered() {
        let cli = client();
        for _ in 0..2 {
            let resp = cli.get("/api/users").send().await;
            resp.assert_status_is_ok();
            resp.assert_json(json!([
                {"id": 1, "name": "John Doe"},
                {"id": 2, "name": "Jane Smith"},
            ])).await;
        }
    }

    #[tokio::test]
    async fn lookup_echoes_id() {
        let cli = client();

        let resp = cli.get("/api/users/1").send().await;
        resp.assert_status_is_ok();
        resp.assert_json(json!({"id": 1, "name": "User 1"})).await;

        // Not in the listing, still answered.
        let resp = cli.get("/api/users/42").send().await;
        resp.assert_status_is_ok();
        resp.assert_json(json!({"id": 42, "name": "User 42"})).await;

        let resp = cli.get("/api/users/-7").send().await;
        resp.assert_status_is_ok();
        resp.assert_json(json!({"id": -7, "name": "User -7"})).await;
    }

    #[tokio::test]
    async fn lookup_rejects_non_integer_id() {
        let cli = client();

        let resp = cli.get("/api/users/abc").send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.assert_content_type("application/json; charset=utf-8");
        let body = resp.json().await;
        let obj = body.value().object();
        obj.get("result_code").assert_string("400");
        let msg = obj.get("result_msg").string().to_string();
        assert!(msg.contains("`id`"), "{}", msg);
        assert!(!msg.contains("param0"), "{}", msg);

        let resp = cli.get("/api/users/1.5").send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.assert_content_type("application/json; charset=utf-8");

        // Out of i32 range.
        let resp = cli.get("/api/users/2147483648").send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn version_reports_crate_version() {
        let resp = client().get("/api/version").send().await;
        resp.assert_status_is_ok();
        let body = resp.json().await;
        let obj = body.value().object();
        obj.get("result_code").assert_string("0");
        obj.get("result_msg").assert_string("success");
        obj.get("server_version").assert_string(env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn spec_documents_the_user_routes() {
        let resp = client().get("/spec").send().await;
        resp.assert_status_is_ok();
        let text = resp.0.into_body().into_string().await.unwrap();
        assert!(text.contains("/api/users"));
        assert!(text.contains("/api/users/{id}"));
    }

    #[tokio::test]
    async fn concurrent_lookups_do_not_interfere() {
        let cli = client();
        let ids: Vec<i32> = (0..32).collect();
        let resps = join_all(ids.iter().map(|id| cli.get(format!("/api/users/{}", id)).send())).await;
        for (id, resp) in ids.iter().zip(resps) {
            resp.assert_status_is_ok();
            resp.assert_json(json!({"id": id, "name": format!("User {}", id)})).await;
        }
    }
}
