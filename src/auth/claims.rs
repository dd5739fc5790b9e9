use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::profiles::AccountType;

/// Access tokens authorize API calls; refresh tokens only buy a new pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload. `role` is the account type at signing time; accounts never
/// change type, so it is safe to authorize on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: AccountType,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

impl Claims {
    pub fn new(
        profile_id: Uuid,
        role: AccountType,
        kind: TokenKind,
        issued_at: OffsetDateTime,
        ttl: Duration,
        issuer: &str,
        audience: &str,
    ) -> Self {
        Self {
            sub: profile_id,
            role,
            kind,
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + ttl).unix_timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
        }
    }

    pub fn is_nutritionist(&self) -> bool {
        self.role == AccountType::Nutritionist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_issue_time_plus_ttl() {
        let now = OffsetDateTime::now_utc();
        let c = Claims::new(
            Uuid::new_v4(),
            AccountType::User,
            TokenKind::Access,
            now,
            Duration::minutes(5),
            "iss",
            "aud",
        );
        assert_eq!(c.exp - c.iat, 300);
        assert!(!c.is_nutritionist());
    }

    #[test]
    fn role_and_kind_serialize_lowercase() {
        let c = Claims::new(
            Uuid::new_v4(),
            AccountType::Nutritionist,
            TokenKind::Refresh,
            OffsetDateTime::now_utc(),
            Duration::hours(1),
            "iss",
            "aud",
        );
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["role"], "nutritionist");
        assert_eq!(v["kind"], "refresh");
    }
}
