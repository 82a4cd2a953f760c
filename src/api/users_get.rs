#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{ OpenApi, payload::Json, param::Path, ApiResponse };

use crate::utils::domain_types::User;
use crate::utils::errors::HttpResult;
use crate::utils::writer_utils::{self, RequestDebug};
use log::debug;

const BAD_ID_MSG: &str = "Invalid user id";

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct GetUserApi;

struct ReqGetUser
{
    id: i32,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqGetUser {
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(64);
        s.push_str("  Request body:");
        s.push_str("\n    id: ");
        s.push_str(&self.id.to_string());
        s
    }
}

// ------------------- HTTP Status Codes -------------------
// An {id} that doesn't parse as an i32 never reaches the handler; the
// bad request handler turns the parse error into a 400.
#[derive(Debug, ApiResponse)]
#[oai(bad_request_handler = "make_http_400")]
enum UserResponse {
    #[oai(status = 200)]
    Http200(Json<User>),
    #[oai(status = 400)]
    Http400(Json<HttpResult>),
}

fn make_http_200(user: User) -> UserResponse {
    UserResponse::Http200(Json(user))
}
// The framework's parse error names the parameter by position, so the
// message is rewritten in terms of the documented `id` parameter.
fn make_http_400(err: poem::Error) -> UserResponse {
    debug!("Rejected user id: {}", err);
    let msg = format!("{}: the path parameter `id` must be a 32-bit integer.", BAD_ID_MSG);
    UserResponse::Http400(Json(HttpResult::new(400.to_string(), msg)))
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl GetUserApi {
    #[oai(path = "/api/users/:id", method = "get")]
    async fn get_user_api(&self, http_req: &Request, id: Path<i32>) -> UserResponse {
        // Package the request parameters.
        let req = ReqGetUser {id: id.0};

        // Conditional logging depending on log level.
        writer_utils::debug_request(http_req, &req);

        // The identifier is echoed back, never looked up.
        make_http_200(User::from_id(req.id))
    }
}
