use std::time::Duration;

use serde_json::json;
use shared::domain::AuditEvent;

use super::*;
use crate::support::{harness, status_error, Step};

fn credentials() -> Credentials {
    Credentials {
        username: "alice".to_string(),
        password: "hunter2".to_string(),
    }
}

#[tokio::test]
async fn login_posts_credentials_after_audit_event() {
    let h = harness(false);
    h.transport
        .respond_with(Ok(ApiResponse::new(200, json!({ "token": "t-1" }))));

    let outcome = h.context.login(&credentials()).await.expect("login");

    assert_eq!(
        outcome,
        ActionOutcome::Completed(ApiResponse::new(200, json!({ "token": "t-1" })))
    );
    assert_eq!(
        h.journal.steps(),
        vec![
            Step::Audited(AuditEvent::new("auth", "login", "alice")),
            Step::Requested {
                method: HttpMethod::Post,
                path: "/auth/login".to_string(),
                body: Some(json!({ "username": "alice", "password": "hunter2" })),
            },
        ]
    );
}

#[tokio::test]
async fn login_failure_notifies_with_server_message_and_records_error_event() {
    let h = harness(false);
    h.transport.respond_with(Err(status_error(
        "/auth/login",
        401,
        Some("bad credentials"),
    )));

    let err = h
        .context
        .login(&credentials())
        .await
        .expect_err("login must fail");

    assert_eq!(err.server_message(), Some("bad credentials"));
    assert_eq!(h.journal.notifications(), vec!["bad credentials".to_string()]);
    assert_eq!(
        h.journal.audits(),
        vec![
            AuditEvent::new("auth", "login", "alice"),
            AuditEvent::new("errors", "error login in", "alice"),
        ]
    );

    let Some(Step::Notified { options, .. }) = h
        .journal
        .steps()
        .into_iter()
        .find(|step| matches!(step, Step::Notified { .. }))
    else {
        panic!("expected a notification");
    };
    assert!(options.dedupe);
    assert_eq!(options.duration, Duration::from_millis(700));
}

#[tokio::test]
async fn login_failure_without_server_message_falls_back_to_error_text() {
    let h = harness(false);
    h.transport
        .respond_with(Err(status_error("/auth/login", 502, None)));

    h.context
        .login(&credentials())
        .await
        .expect_err("login must fail");

    assert_eq!(
        h.journal.notifications(),
        vec!["request to /auth/login failed with status 502".to_string()]
    );
}

#[tokio::test]
async fn register_forwards_fields_and_does_not_notify_on_failure() {
    let h = harness(false);
    h.transport
        .respond_with(Err(status_error("/auth/register", 409, Some("taken"))));
    let info = RegistrationInfo {
        password: "pw".to_string(),
        name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
    };

    h.context.register(&info).await.expect_err("must fail");

    assert!(h.journal.notifications().is_empty());
    assert_eq!(
        h.journal.steps(),
        vec![
            Step::Audited(AuditEvent::new("auth", "register", "ada@example.com")),
            Step::Requested {
                method: HttpMethod::Post,
                path: "/auth/register".to_string(),
                body: Some(json!({
                    "password": "pw",
                    "name": "Ada",
                    "lastName": "Lovelace",
                    "email": "ada@example.com",
                })),
            },
        ]
    );
}

#[tokio::test]
async fn forgot_password_sends_reset_request() {
    let h = harness(false);

    h.context
        .send_forgot_password_email("ada@example.com")
        .await
        .expect("reset");

    assert_eq!(
        h.journal.audits(),
        vec![AuditEvent::new(
            "auth",
            "sendForgotPasswordEmail",
            "ada@example.com"
        )]
    );
    assert_eq!(
        h.journal.requests(),
        vec![Step::Requested {
            method: HttpMethod::Post,
            path: "/users/request-password-reset".to_string(),
            body: Some(json!({ "email": "ada@example.com" })),
        }]
    );
}

#[tokio::test]
async fn regain_account_labels_event_with_reset_id() {
    let h = harness(false);
    let request = RegainAccountRequest {
        new_password: "new-pw".to_string(),
        reset_uid: "r-42".to_string(),
        secret_key: "s3cret".to_string(),
    };

    h.context.regain_account(&request).await.expect("regain");

    assert_eq!(
        h.journal.audits(),
        vec![AuditEvent::new("auth", "regainAccount", "resetUID r-42")]
    );
    assert_eq!(
        h.journal.requests(),
        vec![Step::Requested {
            method: HttpMethod::Post,
            path: "/users/regain-password".to_string(),
            body: Some(json!({
                "newPassword": "new-pw",
                "resetUID": "r-42",
                "secretKey": "s3cret",
            })),
        }]
    );
}

#[tokio::test]
async fn verify_recaptcha_records_no_audit_event() {
    let h = harness(false);

    h.context.verify_recaptcha("captcha-token").await.expect("verify");

    assert!(h.journal.audits().is_empty());
    assert_eq!(
        h.journal.requests(),
        vec![Step::Requested {
            method: HttpMethod::Post,
            path: "/auth/recaptcha".to_string(),
            body: Some(json!({ "recaptchaResponse": "captcha-token" })),
        }]
    );
}
