use shared::protocol::{
    Credentials, PasswordResetRequest, RecaptchaRequest, RegainAccountRequest, RegistrationInfo,
};
use tracing::{error, info};

use crate::{ActionContext, ActionError, ActionOutcome, ActionResult, ApiResponse, HttpMethod};

const AUTH: &str = "auth";
const ERRORS: &str = "errors";

impl ActionContext {
    /// Exchanges credentials for a session. The raw response is returned;
    /// extracting the session from it is left to the caller.
    ///
    /// On failure the server message is shown to the user and a second audit
    /// event is recorded before the error is returned.
    pub async fn login(&self, credentials: &Credentials) -> ActionResult<ApiResponse> {
        self.record(AUTH, "login", credentials.username.as_str());

        match self
            .send(HttpMethod::Post, "/auth/login", Some(credentials))
            .await
        {
            Ok(response) => {
                info!(username = %credentials.username, "auth: login succeeded");
                Ok(ActionOutcome::Completed(response))
            }
            Err(err) => {
                error!(username = %credentials.username, error = %err, "auth: login failed");
                let message = login_failure_message(&err);
                self.notifier.show_error(&message, &self.options.login_toast);
                self.record(ERRORS, "error login in", credentials.username.as_str());
                Err(err)
            }
        }
    }

    pub async fn register(&self, info: &RegistrationInfo) -> ActionResult<ApiResponse> {
        self.record(AUTH, "register", info.email.as_str());
        let response = self
            .send(HttpMethod::Post, "/auth/register", Some(info))
            .await?;
        Ok(ActionOutcome::Completed(response))
    }

    pub async fn send_forgot_password_email(&self, email: &str) -> ActionResult<ApiResponse> {
        self.record(AUTH, "sendForgotPasswordEmail", email);
        let body = PasswordResetRequest {
            email: email.to_string(),
        };
        let response = self
            .send(HttpMethod::Post, "/users/request-password-reset", Some(&body))
            .await?;
        Ok(ActionOutcome::Completed(response))
    }

    pub async fn regain_account(&self, request: &RegainAccountRequest) -> ActionResult<ApiResponse> {
        self.record(AUTH, "regainAccount", format!("resetUID {}", request.reset_uid));
        let response = self
            .send(HttpMethod::Post, "/users/regain-password", Some(request))
            .await?;
        Ok(ActionOutcome::Completed(response))
    }

    pub async fn verify_recaptcha(&self, recaptcha_response: &str) -> ActionResult<ApiResponse> {
        let body = RecaptchaRequest {
            recaptcha_response: recaptcha_response.to_string(),
        };
        let response = self
            .send(HttpMethod::Post, "/auth/recaptcha", Some(&body))
            .await?;
        Ok(ActionOutcome::Completed(response))
    }
}

fn login_failure_message(err: &ActionError) -> String {
    err.server_message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
