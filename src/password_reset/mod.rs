//! Two-step "forgot password" flow on the login screen.
//!
//! Step 1 proves the user knows their current password by calling the normal
//! login endpoint; step 2 changes it. All state lives in [`PasswordReset`] and
//! is thrown away whenever the modal closes.
//!
//! ```text
//! Closed -> VerifyIdentity -> Verifying -> SetPassword -> Submitting -> Succeeded -> Closed
//!                 ^                            |
//!                 +----------- back -----------+
//! ```
//!
//! Any step can go straight to `Closed`. Every `open`/`close` starts a new
//! session; `finish_*` drop results tagged with an older session.

use crate::api::{ApiClient, ApiError, ApiErrorKind, ApiResult, ChangePasswordRequest, LoginResponse};

pub(crate) const MIN_PASSWORD_LEN: usize = 6;

/// Delay between the success message and the modal closing itself.
pub(crate) const SUCCESS_CLOSE_MS: u64 = 2000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum ResetStep {
    #[default]
    Closed,
    VerifyIdentity,
    Verifying,
    SetPassword,
    Submitting,
    Succeeded,
}

/// Identifies one open/close cycle of the modal.
pub(crate) type SessionId = u64;

/// Proof of identity from step 1. Only lives inside an open modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct VerifiedUser {
    pub email: String,
    pub current_password: String,
    pub token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum PasswordRuleError {
    #[error("Please fill in all fields")]
    Empty,
    #[error("New password must be at least 6 characters long")]
    TooShort,
    #[error("New passwords do not match")]
    Mismatch,
    #[error("New password must be different from the current password")]
    SameAsCurrent,
    #[error("Please verify your current password first")]
    NotVerified,
}

/// Client-side checks run before the change-password call, in this order.
pub(crate) fn validate_new_password(current: &str, new: &str, confirm: &str) -> Result<(), PasswordRuleError> {
    if new.is_empty() || confirm.is_empty() {
        return Err(PasswordRuleError::Empty);
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordRuleError::TooShort);
    }
    if new != confirm {
        return Err(PasswordRuleError::Mismatch);
    }
    if new == current {
        return Err(PasswordRuleError::SameAsCurrent);
    }
    Ok(())
}

pub(crate) fn verify_error_message(e: &ApiError) -> String {
    match e.kind {
        ApiErrorKind::Unauthorized => "Invalid email or current password".to_string(),
        ApiErrorKind::NotFound => "Email not found".to_string(),
        ApiErrorKind::Network => "Unable to reach the server. Please try again.".to_string(),
        _ if !e.message.trim().is_empty() => e.message.clone(),
        _ => "Verification failed. Please try again.".to_string(),
    }
}

pub(crate) fn change_error_message(e: &ApiError) -> String {
    match e.kind {
        ApiErrorKind::BadRequest if !e.field_errors.is_empty() => e.field_errors.join(", "),
        ApiErrorKind::BadRequest => "Invalid password change request".to_string(),
        ApiErrorKind::NotFound => "User not found".to_string(),
        _ => "Failed to change password. Please try again.".to_string(),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PasswordReset {
    pub step: ResetStep,
    pub email: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    pub verified: Option<VerifiedUser>,
    pub error: Option<String>,
    pub success: Option<String>,
    session: SessionId,
}

impl PasswordReset {
    pub fn is_open(&self) -> bool {
        self.step != ResetStep::Closed
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.step, ResetStep::Verifying | ResetStep::Submitting)
    }

    /// Step 1 or 2 as shown to the user.
    pub fn step_number(&self) -> u8 {
        match self.step {
            ResetStep::Closed | ResetStep::VerifyIdentity | ResetStep::Verifying => 1,
            ResetStep::SetPassword | ResetStep::Submitting | ResetStep::Succeeded => 2,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn open(&mut self) {
        *self = Self {
            step: ResetStep::VerifyIdentity,
            session: self.session.wrapping_add(1),
            ..Self::default()
        };
    }

    /// Cancel or finish: drop every transient field.
    pub fn close(&mut self) {
        *self = Self {
            session: self.session.wrapping_add(1),
            ..Self::default()
        };
    }

    /// Success auto-close. A no-op once the user closed or reopened the modal.
    pub fn close_if_succeeded(&mut self, session: SessionId) {
        if self.session == session && self.step == ResetStep::Succeeded {
            self.close();
        }
    }

    /// Step 2 -> step 1. The proof of identity is discarded.
    pub fn back(&mut self) {
        if self.step != ResetStep::SetPassword {
            return;
        }
        self.step = ResetStep::VerifyIdentity;
        self.verified = None;
        self.new_password.clear();
        self.confirm_password.clear();
        self.error = None;
    }

    /// Start step 1. Returns the session tag and the credentials to send to
    /// the login endpoint.
    pub fn begin_verify(&mut self) -> Option<(SessionId, String, String)> {
        if self.step != ResetStep::VerifyIdentity {
            return None;
        }
        let email = self.email.trim().to_string();
        if email.is_empty() || self.current_password.is_empty() {
            self.error = Some("Please enter your email and current password".to_string());
            return None;
        }

        self.error = None;
        self.step = ResetStep::Verifying;
        Some((self.session, email, self.current_password.clone()))
    }

    pub fn finish_verify(&mut self, session: SessionId, result: ApiResult<LoginResponse>) {
        if self.session != session || self.step != ResetStep::Verifying {
            return;
        }

        match result {
            Ok(resp) => {
                self.verified = Some(VerifiedUser {
                    email: self.email.trim().to_string(),
                    current_password: self.current_password.clone(),
                    token: Some(resp.token),
                });
                self.error = None;
                self.step = ResetStep::SetPassword;
            }
            Err(e) => {
                self.error = Some(verify_error_message(&e));
                self.step = ResetStep::VerifyIdentity;
            }
        }
    }

    /// Start step 2. Returns the session tag, the request and the token that
    /// authorizes it, or records a validation error and returns `None`.
    pub fn begin_change(&mut self) -> Option<(SessionId, ChangePasswordRequest, Option<String>)> {
        if self.step != ResetStep::SetPassword {
            return None;
        }
        let Some(verified) = self.verified.clone() else {
            self.error = Some(PasswordRuleError::NotVerified.to_string());
            return None;
        };

        if let Err(e) = validate_new_password(
            &verified.current_password,
            &self.new_password,
            &self.confirm_password,
        ) {
            self.error = Some(e.to_string());
            return None;
        }

        self.error = None;
        self.step = ResetStep::Submitting;
        Some((
            self.session,
            ChangePasswordRequest {
                current_password: verified.current_password,
                new_password: self.new_password.clone(),
                confirm_password: self.confirm_password.clone(),
            },
            verified.token,
        ))
    }

    pub fn finish_change(&mut self, session: SessionId, result: ApiResult<()>) {
        if self.session != session || self.step != ResetStep::Submitting {
            return;
        }

        match result {
            Ok(()) => {
                self.error = None;
                self.success = Some("Password changed successfully. You can now log in.".to_string());
                self.step = ResetStep::Succeeded;
            }
            Err(e) => {
                self.error = Some(change_error_message(&e));
                self.step = ResetStep::SetPassword;
            }
        }
    }
}

/// Backend calls used by the flow.
pub(crate) trait ResetGateway {
    async fn verify_credentials(&self, email: &str, password: &str) -> ApiResult<LoginResponse>;
    async fn change_password(&self, token: Option<String>, req: &ChangePasswordRequest) -> ApiResult<()>;
}

impl ResetGateway for ApiClient {
    async fn verify_credentials(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        self.login(email, password).await
    }

    async fn change_password(&self, token: Option<String>, req: &ChangePasswordRequest) -> ApiResult<()> {
        ApiClient::change_password(&self.with_token(token), req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, UserProfile};
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};

    struct FakeAuth {
        login_status: Option<u16>,
        change_error: Option<ApiError>,
        logins: Cell<usize>,
        changes: RefCell<Vec<(Option<String>, ChangePasswordRequest)>>,
    }

    impl FakeAuth {
        fn ok() -> Self {
            Self {
                login_status: None,
                change_error: None,
                logins: Cell::new(0),
                changes: RefCell::new(Vec::new()),
            }
        }
    }

    impl ResetGateway for FakeAuth {
        async fn verify_credentials(&self, email: &str, _password: &str) -> ApiResult<LoginResponse> {
            self.logins.set(self.logins.get() + 1);
            if let Some(status) = self.login_status {
                return Err(ApiError::from_status(status, Some("backend said no".to_string()), Vec::new()));
            }
            Ok(LoginResponse {
                token: "verify-token".to_string(),
                user: UserProfile {
                    id: "u1".to_string(),
                    full_name: "Student".to_string(),
                    email: email.to_string(),
                    role: Role::User,
                    mentor_id: None,
                    profile_image_url: None,
                },
            })
        }

        async fn change_password(&self, token: Option<String>, req: &ChangePasswordRequest) -> ApiResult<()> {
            self.changes.borrow_mut().push((token, req.clone()));
            match &self.change_error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    // Mirrors what the login page does around each await point.
    fn run_verify(gw: &FakeAuth, s: &mut PasswordReset) {
        if let Some((session, email, password)) = s.begin_verify() {
            let res = block_on(gw.verify_credentials(&email, &password));
            s.finish_verify(session, res);
        }
    }

    fn run_change(gw: &FakeAuth, s: &mut PasswordReset) {
        if let Some((session, req, token)) = s.begin_change() {
            let res = block_on(gw.change_password(token, &req));
            s.finish_change(session, res);
        }
    }

    fn verified_session(gw: &FakeAuth) -> PasswordReset {
        let mut s = PasswordReset::default();
        s.open();
        s.email = "student@example.com".to_string();
        s.current_password = "oldpass".to_string();
        run_verify(gw, &mut s);
        assert_eq!(s.step, ResetStep::SetPassword);
        s
    }

    #[test]
    fn test_verify_success_stores_verified_user_and_advances() {
        let gw = FakeAuth::ok();
        let s = verified_session(&gw);

        assert_eq!(s.step_number(), 2);
        let v = s.verified.expect("verified user should be set");
        assert_eq!(v.email, "student@example.com");
        assert_eq!(v.current_password, "oldpass");
        assert_eq!(v.token.as_deref(), Some("verify-token"));
        assert!(s.error.is_none());
    }

    #[test]
    fn test_verify_wrong_password_stays_on_step_one() {
        let gw = FakeAuth {
            login_status: Some(401),
            ..FakeAuth::ok()
        };
        let mut s = PasswordReset::default();
        s.open();
        s.email = "student@example.com".to_string();
        s.current_password = "wrong".to_string();
        run_verify(&gw, &mut s);

        assert_eq!(s.step, ResetStep::VerifyIdentity);
        assert_eq!(s.error.as_deref(), Some("Invalid email or current password"));
        assert!(s.verified.is_none());
    }

    #[test]
    fn test_verify_error_messages() {
        let e404 = ApiError::from_status(404, None, Vec::new());
        assert_eq!(verify_error_message(&e404), "Email not found");

        let e500 = ApiError::from_status(500, Some("Database unavailable".to_string()), Vec::new());
        assert_eq!(verify_error_message(&e500), "Database unavailable");
    }

    #[test]
    fn test_verify_requires_both_fields() {
        let gw = FakeAuth::ok();
        let mut s = PasswordReset::default();
        s.open();
        s.email = "student@example.com".to_string();
        run_verify(&gw, &mut s);

        assert_eq!(gw.logins.get(), 0);
        assert_eq!(s.step, ResetStep::VerifyIdentity);
        assert!(s.error.is_some());
    }

    #[test]
    fn test_step_two_rules_each_block_the_call() {
        let cases = [
            ("", "", PasswordRuleError::Empty),
            ("abcdef", "", PasswordRuleError::Empty),
            ("abc", "abc", PasswordRuleError::TooShort),
            ("abcdef", "abcdeg", PasswordRuleError::Mismatch),
            ("oldpass", "oldpass", PasswordRuleError::SameAsCurrent),
        ];

        for (new, confirm, expected) in cases {
            let gw = FakeAuth::ok();
            let mut s = verified_session(&gw);
            s.new_password = new.to_string();
            s.confirm_password = confirm.to_string();
            run_change(&gw, &mut s);

            assert!(gw.changes.borrow().is_empty(), "{expected:?} must not call the backend");
            assert_eq!(s.step, ResetStep::SetPassword);
            assert_eq!(s.error, Some(expected.to_string()));
        }
    }

    #[test]
    fn test_change_success_sends_verified_token_and_fields() {
        let gw = FakeAuth::ok();
        let mut s = verified_session(&gw);
        s.new_password = "newpass1".to_string();
        s.confirm_password = "newpass1".to_string();
        run_change(&gw, &mut s);

        assert_eq!(s.step, ResetStep::Succeeded);
        assert!(s.success.is_some());

        let changes = gw.changes.borrow();
        assert_eq!(changes.len(), 1);
        let (token, req) = &changes[0];
        assert_eq!(token.as_deref(), Some("verify-token"));
        assert_eq!(
            *req,
            ChangePasswordRequest {
                current_password: "oldpass".to_string(),
                new_password: "newpass1".to_string(),
                confirm_password: "newpass1".to_string(),
            }
        );
    }

    #[test]
    fn test_change_error_messages() {
        let structured = ApiError::from_status(
            400,
            Some("Validation failed".to_string()),
            vec!["Password needs a digit".to_string(), "Password needs a symbol".to_string()],
        );
        assert_eq!(
            change_error_message(&structured),
            "Password needs a digit, Password needs a symbol"
        );

        let bare = ApiError::from_status(400, None, Vec::new());
        assert_eq!(change_error_message(&bare), "Invalid password change request");

        let missing = ApiError::from_status(404, None, Vec::new());
        assert_eq!(change_error_message(&missing), "User not found");

        let other = ApiError::from_status(503, None, Vec::new());
        assert_eq!(change_error_message(&other), "Failed to change password. Please try again.");
    }

    #[test]
    fn test_change_failure_returns_to_step_two() {
        let gw = FakeAuth {
            change_error: Some(ApiError::from_status(404, None, Vec::new())),
            ..FakeAuth::ok()
        };
        let mut s = verified_session(&gw);
        s.new_password = "newpass1".to_string();
        s.confirm_password = "newpass1".to_string();
        run_change(&gw, &mut s);

        assert_eq!(s.step, ResetStep::SetPassword);
        assert_eq!(s.error.as_deref(), Some("User not found"));
        assert!(s.verified.is_some());
    }

    #[test]
    fn test_close_resets_everything_from_any_step() {
        let gw = FakeAuth::ok();

        let mut step_one = PasswordReset::default();
        step_one.open();
        step_one.email = "x@example.com".to_string();
        step_one.error = Some("boom".to_string());

        let mut step_two = verified_session(&gw);
        step_two.new_password = "partial".to_string();

        let mut done = verified_session(&gw);
        done.new_password = "newpass1".to_string();
        done.confirm_password = "newpass1".to_string();
        run_change(&gw, &mut done);
        assert_eq!(done.step, ResetStep::Succeeded);

        for mut s in [step_one, step_two, done] {
            s.close();
            assert_eq!(
                s,
                PasswordReset {
                    session: s.session,
                    ..PasswordReset::default()
                }
            );

            s.open();
            assert_eq!(s.step, ResetStep::VerifyIdentity);
            assert!(s.email.is_empty() && s.current_password.is_empty());
            assert!(s.new_password.is_empty() && s.confirm_password.is_empty());
            assert!(s.verified.is_none() && s.error.is_none() && s.success.is_none());
        }
    }

    #[test]
    fn test_late_response_after_close_is_ignored() {
        let mut s = PasswordReset::default();
        s.open();
        s.email = "student@example.com".to_string();
        s.current_password = "oldpass".to_string();
        let (session, _, _) = s.begin_verify().expect("should start verifying");

        s.close();
        let closed = s.clone();
        s.finish_verify(session, Err(ApiError::from_status(401, None, Vec::new())));
        assert_eq!(s, closed);
    }

    fn login_response(token: &str) -> LoginResponse {
        LoginResponse {
            token: token.to_string(),
            user: UserProfile {
                id: "u1".to_string(),
                full_name: "Student".to_string(),
                email: "a@example.com".to_string(),
                role: Role::User,
                mentor_id: None,
                profile_image_url: None,
            },
        }
    }

    #[test]
    fn test_stale_verify_result_does_not_leak_into_reopened_modal() {
        let mut s = PasswordReset::default();
        s.open();
        s.email = "a@example.com".to_string();
        s.current_password = "apass1".to_string();
        let (first, _, _) = s.begin_verify().expect("first attempt starts");

        s.close();
        s.open();
        s.email = "b@example.com".to_string();
        s.current_password = "guess".to_string();
        let (second, _, _) = s.begin_verify().expect("second attempt starts");
        assert_ne!(first, second);

        s.finish_verify(first, Ok(login_response("token-for-a")));
        assert_eq!(s.step, ResetStep::Verifying);
        assert!(s.verified.is_none());

        s.finish_verify(second, Err(ApiError::from_status(401, None, Vec::new())));
        assert_eq!(s.step, ResetStep::VerifyIdentity);
        assert!(s.verified.is_none());
    }

    #[test]
    fn test_stale_change_result_is_dropped_after_reopen() {
        let gw = FakeAuth::ok();
        let mut s = verified_session(&gw);
        s.new_password = "newpass1".to_string();
        s.confirm_password = "newpass1".to_string();
        let (stale, _, _) = s.begin_change().expect("change starts");

        s.close();
        s.open();
        s.email = "student@example.com".to_string();
        s.current_password = "oldpass".to_string();
        run_verify(&gw, &mut s);
        s.new_password = "another1".to_string();
        s.confirm_password = "another1".to_string();
        assert!(s.begin_change().is_some());

        s.finish_change(stale, Ok(()));
        assert_eq!(s.step, ResetStep::Submitting);
        assert!(s.success.is_none());
    }

    #[test]
    fn test_success_timer_only_closes_its_own_session() {
        let gw = FakeAuth::ok();
        let mut s = verified_session(&gw);
        s.new_password = "newpass1".to_string();
        s.confirm_password = "newpass1".to_string();
        run_change(&gw, &mut s);
        assert_eq!(s.step, ResetStep::Succeeded);
        let timer_session = s.session();

        // Closed by hand, then reopened and driven to success again.
        s.close();
        s.open();
        s.email = "student@example.com".to_string();
        s.current_password = "oldpass".to_string();
        run_verify(&gw, &mut s);
        s.new_password = "newpass2".to_string();
        s.confirm_password = "newpass2".to_string();
        run_change(&gw, &mut s);
        assert_eq!(s.step, ResetStep::Succeeded);

        s.close_if_succeeded(timer_session);
        assert_eq!(s.step, ResetStep::Succeeded);

        s.close_if_succeeded(s.session());
        assert!(!s.is_open());
    }

    #[test]
    fn test_back_discards_verified_user() {
        let gw = FakeAuth::ok();
        let mut s = verified_session(&gw);
        s.new_password = "newpass1".to_string();
        s.back();

        assert_eq!(s.step, ResetStep::VerifyIdentity);
        assert!(s.verified.is_none());
        assert!(s.new_password.is_empty());
        assert_eq!(s.email, "student@example.com");
    }
}
