use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{media::Upload, models::user::UserPublic};

/// Text fields and files of the multipart registration form.
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<Upload>,
    pub cover_image: Option<Upload>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

impl LoginRequest {
    /// Non-blank lookup keys, username first.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = [self.username.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        keys.dedup();
        keys
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user: UserPublic,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokensData {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(username: Option<&str>, email: Option<&str>) -> LoginRequest {
        LoginRequest {
            username: username.map(Into::into),
            email: email.map(Into::into),
            password: "pw".into(),
        }
    }

    #[test]
    fn identifiers_keep_both_keys_and_skip_blanks() {
        assert_eq!(login(Some("u1"), Some("u1@x.io")).identifiers(), ["u1", "u1@x.io"]);
        assert_eq!(login(Some("  "), Some("u1@x.io")).identifiers(), ["u1@x.io"]);
        assert_eq!(login(Some("u1"), Some(" u1 ")).identifiers(), ["u1"]);
        assert!(login(None, None).identifiers().is_empty());
    }
}
