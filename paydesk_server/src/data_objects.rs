use std::fmt::Display;

use paydesk_engine::{
    db_types::{Role, User},
    order_objects::OrderUpdate,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user as shown to clients. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Body of a Send request. The id identifies whoever pushes the order into the review queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOrderParams {
    pub actor_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnOrderParams {
    pub analyst_id: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayOrderParams {
    pub analyst_id: i64,
}

/// Body of an Edit request: the acting coordinator plus the full replacement field set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOrderParams {
    pub coordinator_id: i64,
    #[serde(flatten)]
    pub update: OrderUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}
