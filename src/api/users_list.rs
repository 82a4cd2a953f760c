#![forbid(unsafe_code)]

use poem_openapi::{ OpenApi, payload::Json };

use crate::utils::domain_types::User;

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct ListUsersApi;

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl ListUsersApi {
    #[oai(path = "/api/users", method = "get")]
    async fn list_users_api(&self) -> Json<Vec<User>> {
        Json(fixed_users())
    }
}

// ***************************************************************************
//                          Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// fixed_users:
// ---------------------------------------------------------------------------
// The listing is constant and always in this order.
fn fixed_users() -> Vec<User> {
    vec![
        User::new(1, "John Doe"),
        User::new(2, "Jane Smith"),
    ]
}
