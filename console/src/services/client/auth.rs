//! Credential-issuing endpoints and logout.

use serde_json::{json, Value};
use tracing::instrument;

use super::api_client::ApiClient;
use super::errors::ClientResult;
use super::types::{
    EmailLoginRequest, LoginResponse, OtpChallenge, PhoneLoginRequest, VerifyOtpRequest,
};

pub const EMAIL_LOGIN_PATH: &str = "auth/email-login/";
pub const PHONE_LOGIN_PATH: &str = "auth/phone-login/";
pub const VERIFY_OTP_PATH: &str = "auth/verify-otp/";
pub const REFRESH_PATH: &str = "auth/token/refresh/";
pub const LOGOUT_PATH: &str = "auth/logout/";

/// Path fragments of calls that must never trigger an automatic refresh
pub const CREDENTIAL_ISSUING_PATHS: [&str; 4] =
    ["email-login", "phone-login", "verify-otp", "token/refresh"];

pub fn is_credential_issuing(path: &str) -> bool {
    CREDENTIAL_ISSUING_PATHS
        .iter()
        .any(|fragment| path.contains(fragment))
}

impl ApiClient {
    #[instrument(skip(self, password), err)]
    pub async fn email_login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        self.post(EMAIL_LOGIN_PATH, &EmailLoginRequest { email, password })
            .await
    }

    /// Ask the backend to text a one-time code to `phone`
    #[instrument(skip(self), err)]
    pub async fn phone_login(&self, phone: &str) -> ClientResult<OtpChallenge> {
        self.post(PHONE_LOGIN_PATH, &PhoneLoginRequest { phone }).await
    }

    #[instrument(skip(self, code), err)]
    pub async fn verify_otp(&self, phone: &str, code: &str) -> ClientResult<LoginResponse> {
        self.post(VERIFY_OTP_PATH, &VerifyOtpRequest { phone, code })
            .await
    }

    /// Invalidate `refresh_token` on the backend
    #[instrument(skip_all, err)]
    pub async fn logout(&self, refresh_token: &str) -> ClientResult<()> {
        let _: Value = self
            .post(LOGOUT_PATH, &json!({ "refresh": refresh_token }))
            .await?;
        Ok(())
    }
}
