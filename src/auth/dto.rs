use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    pub action: Option<String>,
}

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by login and register: the user plus their fresh session token.
#[derive(Debug, Serialize)]
pub struct AuthSession {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub token: String,
}

/// Returned by verify.
#[derive(Debug, Serialize)]
pub struct VerifiedUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_response_includes_token() {
        let session = AuthSession {
            id: Uuid::new_v4(),
            email: "owner@example.com".into(),
            full_name: Some("Owner".into()),
            token: "ab".repeat(32),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["email"], "owner@example.com");
        assert_eq!(json["token"].as_str().unwrap().len(), 64);
    }
}
