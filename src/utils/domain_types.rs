#![forbid(unsafe_code)]

use poem_openapi::Object;

// ***************************************************************************
//                                  User
// ***************************************************************************
/// A user record. Users are never stored; each one is built for a single
/// response and dropped after serialization.
#[derive(Object, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
}

impl User {
    pub fn new(id: i32, name: &str) -> Self {
        Self {id, name: name.to_string()}
    }

    /// Synthesize a user from nothing but its identifier.
    pub fn from_id(id: i32) -> Self {
        Self {id, name: format!("User {}", id)}
    }
}
