use std::fmt;

use serde::{Deserialize, Serialize};

use crate::services::session::Role;

/// Access and refresh token issued together by a credential-issuing call
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// Tokens never show up in logs or panic messages.
impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// User identifiers arrive as numbers or strings depending on the backend model
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum UserId {
    Number(u64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(id) => write!(f, "{}", id),
            UserId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Who is logged in. This is the record persisted as the session snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: UserId,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub phone: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct EmailLoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize, Debug, Clone)]
pub struct PhoneLoginRequest<'a> {
    pub phone: &'a str,
}

#[derive(Serialize, Debug, Clone)]
pub struct VerifyOtpRequest<'a> {
    pub phone: &'a str,
    pub code: &'a str,
}

/// User record embedded in a login response
#[derive(Deserialize, Debug, Clone)]
pub struct LoginUser {
    pub id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Response of `email-login` and `verify-otp`
#[derive(Deserialize, Debug, Clone)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: LoginUser,
    #[serde(default)]
    pub role: Option<Role>,
}

impl LoginResponse {
    pub fn credentials(&self) -> CredentialPair {
        CredentialPair::new(self.access.clone(), self.refresh.clone())
    }

    /// Derive the session record, or `None` when the response names no role
    pub fn to_session(&self) -> Option<Session> {
        let role = self.role.or(self.user.role)?;
        Some(Session {
            id: self.user.id.clone(),
            display_name: self.display_name(),
            email: non_empty(&self.user.email),
            role,
            phone: non_empty(&self.user.phone),
        })
    }

    fn display_name(&self) -> String {
        non_empty(&self.user.username)
            .or_else(|| non_empty(&self.user.email))
            .or_else(|| non_empty(&self.user.phone))
            .unwrap_or_else(|| self.user.id.to_string())
    }
}

/// Response of `phone-login`: an OTP was sent to the phone
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub message: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Response of `token/refresh`. Backends that rotate refresh tokens return one as well.
#[derive(Deserialize, Debug, Clone)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn login_response(user: serde_json::Value, role: serde_json::Value) -> LoginResponse {
        serde_json::from_value(json!({
            "access": "access-1",
            "refresh": "refresh-1",
            "user": user,
            "role": role,
        }))
        .unwrap()
    }

    #[test]
    fn test_session_derivation_prefers_username() {
        let response = login_response(
            json!({"id": 7, "username": "dana", "email": "dana@example.com", "phone": null, "role": "operator"}),
            json!("dispatcher"),
        );
        let session = response.to_session().unwrap();

        assert_eq!(session.id, UserId::Number(7));
        assert_eq!(session.display_name, "dana");
        assert_eq!(session.email.as_deref(), Some("dana@example.com"));
        assert_eq!(session.phone, None);
        // Top-level role wins over the embedded one
        assert_eq!(session.role, Role::Dispatcher);
    }

    #[test]
    fn test_display_name_fallbacks() {
        let response = login_response(
            json!({"id": "u-1", "username": "  ", "email": "", "phone": "+15550100", "role": "admin"}),
            json!(null),
        );
        let session = response.to_session().unwrap();
        assert_eq!(session.display_name, "+15550100");
        assert_eq!(session.role, Role::Admin);

        let response = login_response(json!({"id": 42, "role": "operator"}), json!(null));
        assert_eq!(response.to_session().unwrap().display_name, "42");
    }

    #[test]
    fn test_missing_role_yields_no_session() {
        let response = login_response(json!({"id": 1, "username": "x"}), json!(null));
        assert!(response.to_session().is_none());
    }

    #[test]
    fn test_session_snapshot_uses_camel_case() {
        let session = Session {
            id: UserId::Number(3),
            display_name: "Ops".to_string(),
            email: None,
            role: Role::Operator,
            phone: Some("+15550111".to_string()),
        };
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["displayName"], "Ops");
        assert_eq!(value["role"], "operator");
    }

    #[test]
    fn test_credential_pair_debug_is_redacted() {
        let pair = CredentialPair::new("secret-access", "secret-refresh");
        let rendered = format!("{:?}", pair);
        assert!(!rendered.contains("secret"));
    }
}
