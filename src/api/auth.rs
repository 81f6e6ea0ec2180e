use super::{ApiClient, ApiResult};
use crate::models::UserProfile;
use reqwest::Method;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ApiClient {
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = Self::to_body(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        self.send(Method::POST, "/auth/login", Some(body)).await
    }

    /// Authorized by whatever token this client carries; the password-reset
    /// flow passes the token obtained while verifying the current password.
    pub async fn change_password(&self, req: &ChangePasswordRequest) -> ApiResult<()> {
        let body = Self::to_body(req)?;
        self.send_unit(Method::PUT, "/auth/change-password", Some(body))
            .await
    }
}
