#![forbid(unsafe_code)]

use poem_openapi::{ OpenApi, payload::Json, Object };

const GREETING: &str = "Hello, World!";

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct RootApi;

#[derive(Object)]
struct RespGreeting
{
    message: String,
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl RootApi {
    #[oai(path = "/", method = "get")]
    async fn hello(&self) -> Json<RespGreeting> {
        Json(RespGreeting {message: GREETING.to_string()})
    }
}
