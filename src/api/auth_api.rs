// ==========================================
// 酒店服务质量问卷 - 管理员鉴权 API
// ==========================================
// 职责: 口令登录、会话签发、会话校验、登出
// 存储: 会话仅保存在内存 (进程退出即失效)
// 口令: 只比较 SHA-256 摘要,明文不落盘
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{password_digest, SurveyConfigReader};
use crate::i18n::t;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::instrument;
use uuid::Uuid;

/// 管理员会话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// ==========================================
// AuthApi - 管理员鉴权 API
// ==========================================
pub struct AuthApi {
    config: Arc<dyn SurveyConfigReader>,
    sessions: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl AuthApi {
    pub fn new(config: Arc<dyn SurveyConfigReader>) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// 口令登录
    ///
    /// # 返回
    /// - Ok(AdminSession): 新会话
    /// - Err(ApiError::Unauthorized): 未配置口令或口令错误
    #[instrument(skip(self, password))]
    pub async fn login(&self, password: &str) -> ApiResult<AdminSession> {
        let expected = self
            .config
            .get_admin_password_digest()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let expected = match expected {
            Some(d) => d,
            None => {
                tracing::warn!("管理员口令未配置,拒绝登录");
                return Err(ApiError::Unauthorized(t("auth.not_configured")));
            }
        };

        if password_digest(password) != expected {
            tracing::warn!("管理员口令错误");
            return Err(ApiError::Unauthorized(t("auth.invalid_password")));
        }

        let ttl_minutes = self
            .config
            .get_session_ttl_minutes()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let now = Utc::now();
        let expires_at = Duration::try_minutes(ttl_minutes)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                ApiError::ConfigError(format!("session_ttl_minutes 超出范围: {}", ttl_minutes))
            })?;
        let session = AdminSession {
            token: Uuid::new_v4().to_string(),
            expires_at,
        };

        let mut sessions = self.lock_sessions()?;
        sessions.retain(|_, exp| *exp > now);
        sessions.insert(session.token.clone(), session.expires_at);
        drop(sessions);
        tracing::info!(expires_at = %session.expires_at, "管理员登录成功");
        Ok(session)
    }

    /// 登出 (未知 token 静默忽略)
    pub fn logout(&self, token: &str) -> ApiResult<()> {
        if self.lock_sessions()?.remove(token).is_some() {
            tracing::info!("管理员已登出");
        }
        Ok(())
    }

    /// 校验会话
    pub fn require_session(&self, token: &str) -> ApiResult<()> {
        self.require_session_at(token, Utc::now())
    }

    /// 以指定时刻校验会话; 过期会话会被移除
    pub fn require_session_at(&self, token: &str, now: DateTime<Utc>) -> ApiResult<()> {
        let mut sessions = self.lock_sessions()?;
        match sessions.get(token).copied() {
            Some(expires_at) if expires_at > now => Ok(()),
            Some(_) => {
                sessions.remove(token);
                tracing::debug!("会话已过期");
                Err(ApiError::Unauthorized(t("auth.session_required")))
            }
            None => Err(ApiError::Unauthorized(t("auth.session_required"))),
        }
    }

    /// 当前有效会话数
    pub fn active_sessions(&self) -> ApiResult<usize> {
        let now = Utc::now();
        Ok(self
            .lock_sessions()?
            .values()
            .filter(|expires_at| **expires_at > now)
            .count())
    }

    fn lock_sessions(&self) -> ApiResult<std::sync::MutexGuard<'_, HashMap<String, DateTime<Utc>>>> {
        self.sessions
            .lock()
            .map_err(|e| ApiError::InternalError(format!("会话表锁获取失败: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::error::Error;

    struct FixedConfig {
        digest: Option<String>,
        ttl: i64,
    }

    #[async_trait]
    impl SurveyConfigReader for FixedConfig {
        async fn get_admin_password_digest(
            &self,
        ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
            Ok(self.digest.clone())
        }

        async fn get_session_ttl_minutes(&self) -> Result<i64, Box<dyn Error + Send + Sync>> {
            Ok(self.ttl)
        }

        async fn get_locale(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
            Ok("es".to_string())
        }
    }

    fn auth(digest: Option<&str>) -> AuthApi {
        auth_with_ttl(digest, 30)
    }

    fn auth_with_ttl(digest: Option<&str>, ttl: i64) -> AuthApi {
        AuthApi::new(Arc::new(FixedConfig {
            digest: digest.map(password_digest),
            ttl,
        }))
    }

    #[tokio::test]
    async fn test_login_and_require_session() {
        let api = auth(Some("clave"));
        let session = api.login("clave").await.unwrap();
        assert!(Uuid::parse_str(&session.token).is_ok());
        assert!(api.require_session(&session.token).is_ok());
        assert_eq!(api.active_sessions().unwrap(), 1);

        api.logout(&session.token).unwrap();
        assert!(matches!(
            api.require_session(&session.token),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let api = auth(Some("clave"));
        assert!(matches!(
            api.login("otra").await,
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_password_rejects_everything() {
        let api = auth(None);
        assert!(matches!(api.login("").await, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_expired_session_is_removed() {
        let api = auth(Some("clave"));
        let session = api.login("clave").await.unwrap();
        let later = session.expires_at + Duration::seconds(1);
        assert!(api.require_session_at(&session.token, later).is_err());
        // 已被移除,即使回到有效时间也不再接受
        assert!(api.require_session(&session.token).is_err());
    }

    #[tokio::test]
    async fn test_oversized_ttl_is_config_error() {
        let api = auth_with_ttl(Some("clave"), i64::MAX);
        assert!(matches!(
            api.login("clave").await,
            Err(ApiError::ConfigError(_))
        ));
        assert_eq!(api.active_sessions().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_login_prunes_expired_sessions() {
        let api = auth(Some("clave"));
        let old = api.login("clave").await.unwrap();
        api.lock_sessions()
            .unwrap()
            .insert(old.token.clone(), Utc::now() - Duration::minutes(1));

        let fresh = api.login("clave").await.unwrap();
        let sessions = api.lock_sessions().unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&fresh.token));
        assert!(!sessions.contains_key(&old.token));
    }
}
