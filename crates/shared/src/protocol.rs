//! Request bodies sent to the backend API.

use serde::{Deserialize, Serialize};

use crate::domain::LinkType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInfo {
    pub password: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegainAccountRequest {
    pub new_password: String,
    #[serde(rename = "resetUID")]
    pub reset_uid: String,
    pub secret_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecaptchaRequest {
    pub recaptcha_response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRelatedLinkRequest {
    pub url: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
}
