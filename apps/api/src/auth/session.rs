//! Session state: one explicit object per login, stored in Redis under an
//! opaque bearer token. Created on login, read per request, deleted on logout.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use redis::Client as RedisClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Session {
    Student { student_id: Uuid, email: String },
    Admin { email: String },
}

#[derive(Clone)]
pub struct SessionStore {
    redis: RedisClient,
    ttl_secs: u64,
}

impl SessionStore {
    pub fn new(redis: RedisClient, ttl_secs: u64) -> Self {
        Self { redis, ttl_secs }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    fn key(token: &str) -> String {
        format!("session:{token}")
    }

    /// Stores the session and returns its freshly minted token.
    pub async fn create(&self, session: &Session) -> Result<String, AppError> {
        let token = Uuid::new_v4().simple().to_string();
        let payload = serde_json::to_string(session)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode session: {e}")))?;

        let mut con = self.redis.get_multiplexed_async_connection().await?;
        let _: () = redis::cmd("SET")
            .arg(Self::key(&token))
            .arg(payload)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async(&mut con)
            .await?;

        info!("Session created ({})", session.role());
        Ok(token)
    }

    pub async fn get(&self, token: &str) -> Result<Option<Session>, AppError> {
        let mut con = self.redis.get_multiplexed_async_connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(Self::key(token))
            .query_async(&mut con)
            .await?;

        match raw {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    debug!("Discarding unreadable session payload: {e}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    pub async fn delete(&self, token: &str) -> Result<(), AppError> {
        let mut con = self.redis.get_multiplexed_async_connection().await?;
        let _: i64 = redis::cmd("DEL")
            .arg(Self::key(token))
            .query_async(&mut con)
            .await?;
        Ok(())
    }
}

impl Session {
    fn role(&self) -> &'static str {
        match self {
            Session::Student { .. } => "student",
            Session::Admin { .. } => "admin",
        }
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(parts: &Parts) -> Result<String, AppError> {
    let value = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;
    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;
    Ok(token.to_string())
}

/// The raw session token of the caller, whatever their role.
pub struct SessionToken(pub String);

#[async_trait]
impl FromRequestParts<AppState> for SessionToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, AppError> {
        Ok(SessionToken(bearer_token(parts)?))
    }
}

/// A signed-in student.
#[derive(Debug, Clone)]
pub struct StudentSession {
    pub student_id: Uuid,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for StudentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(parts)?;
        match state.sessions.get(&token).await? {
            Some(Session::Student { student_id, email }) => Ok(StudentSession { student_id, email }),
            Some(Session::Admin { .. }) => Err(AppError::Forbidden),
            None => Err(AppError::Unauthorized),
        }
    }
}

/// A signed-in placement officer.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(parts)?;
        match state.sessions.get(&token).await? {
            Some(Session::Admin { email }) => Ok(AdminSession { email }),
            Some(Session::Student { .. }) => Err(AppError::Forbidden),
            None => Err(AppError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/profile");
        if let Some(h) = header {
            builder = builder.header(AUTHORIZATION, h);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with(Some("Bearer abc123"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc123");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let parts = parts_with(None);
        assert!(matches!(bearer_token(&parts), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_non_bearer_scheme_is_unauthorized() {
        let parts = parts_with(Some("Basic dXNlcjpwYXNz"));
        assert!(matches!(bearer_token(&parts), Err(AppError::Unauthorized)));
        let parts = parts_with(Some("Bearer   "));
        assert!(matches!(bearer_token(&parts), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_session_payload_is_role_tagged() {
        let id = Uuid::new_v4();
        let session = Session::Student {
            student_id: id,
            email: "john.doe@university.edu".into(),
        };
        let v = serde_json::to_value(&session).unwrap();
        assert_eq!(v["role"], "student");
        assert_eq!(v["student_id"], id.to_string());
        let back: Session = serde_json::from_value(v).unwrap();
        assert_eq!(back, session);
    }
}
