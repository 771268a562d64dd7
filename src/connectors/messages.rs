// src/connectors/messages.rs
use crate::types::EvaluationResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `/auth/login` answer. The user object is not needed by the dashboard.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LimitQuery {
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct EvaluationQuery {
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<EvaluationResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_query_omits_missing_result() {
        let q = EvaluationQuery { limit: 50, result: None };
        assert_eq!(serde_urlencoded::to_string(&q).unwrap(), "limit=50");

        let q = EvaluationQuery {
            limit: 50,
            result: Some(EvaluationResult::Rejected),
        };
        assert_eq!(serde_urlencoded::to_string(&q).unwrap(), "limit=50&result=rejected");
    }

    #[test]
    fn login_response_ignores_user_payload() {
        let raw = r#"{"user": {"id": "u1", "email": "a@b.c"}, "token": "jwt"}"#;
        let resp: LoginResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.token, "jwt");
    }
}
