use serde::{Deserialize, Serialize};

use crate::profiles::{AccountType, ProfileResponse, ProfileUpdate};

/// Request body for registration. Questionnaire fields may be sent inline.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub account_type: Option<AccountType>,
    #[serde(flatten)]
    pub profile: ProfileUpdate,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response returned after login, register or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub user: ProfileResponse,
}

impl AuthResponse {
    pub fn bearer(access_token: String, refresh_token: String, user: ProfileResponse) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer",
            user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenStatus {
    pub valid: bool,
    pub user: ProfileResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_carries_inline_profile_fields() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email": "carlos@email.com", "password": "secret-pass",
                "name": "Carlos", "weight": 85, "goal": "ganhar massa"}"#,
        )
        .unwrap();
        assert_eq!(req.account_type, None);
        assert_eq!(req.profile.weight_kg, Some(85.0));
        assert_eq!(req.profile.goal.as_deref(), Some("ganhar massa"));
    }

    #[test]
    fn register_request_accepts_nutritionist_account() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email": "maria@email.com", "password": "secret-pass",
                "name": "Maria", "account_type": "nutritionist",
                "license_number": "CRN-3 12345"}"#,
        )
        .unwrap();
        assert_eq!(req.account_type, Some(AccountType::Nutritionist));
        assert_eq!(req.profile.license_number.as_deref(), Some("CRN-3 12345"));
    }
}
