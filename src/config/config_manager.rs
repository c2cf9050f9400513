// ==========================================
// 酒店服务质量问卷 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value)
// ==========================================

use crate::config::survey_config_trait::SurveyConfigReader;
use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

type ConfigError = Box<dyn Error + Send + Sync>;

/// 配置键
pub mod config_keys {
    /// 管理员口令摘要 (SHA-256, hex)
    pub const ADMIN_PASSWORD_SHA256: &str = "admin_password_sha256";
    /// 管理员会话有效期 (分钟)
    pub const SESSION_TTL_MINUTES: &str = "session_ttl_minutes";
    /// 界面语言
    pub const LOCALE: &str = "locale";
}

/// 默认会话有效期（分钟）
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;
/// 会话有效期上限（分钟, 30 天）
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 30;
/// 默认语言
pub const DEFAULT_LOCALE: &str = "es";

/// 口令摘要: SHA-256 小写十六进制
pub fn password_digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入配置值 (UPSERT)
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(key = key, "配置已更新");
        Ok(())
    }

    /// 设置管理员口令 (只保存摘要)
    pub fn set_admin_password(&self, password: &str) -> Result<(), ConfigError> {
        if password.trim().is_empty() {
            return Err("管理员口令不能为空".into());
        }
        self.set_config_value(config_keys::ADMIN_PASSWORD_SHA256, &password_digest(password))
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// 口令摘要不进入快照。
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            if key == config_keys::ADMIN_PASSWORD_SHA256 {
                continue;
            }
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }
}

#[async_trait]
impl SurveyConfigReader for ConfigManager {
    async fn get_admin_password_digest(&self) -> Result<Option<String>, ConfigError> {
        let digest = self
            .get_config_value(config_keys::ADMIN_PASSWORD_SHA256)?
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty());
        Ok(digest)
    }

    async fn get_session_ttl_minutes(&self) -> Result<i64, ConfigError> {
        let raw = self.get_config_or_default(
            config_keys::SESSION_TTL_MINUTES,
            &DEFAULT_SESSION_TTL_MINUTES.to_string(),
        )?;
        match raw.trim().parse::<i64>() {
            Ok(v) if (1..=MAX_SESSION_TTL_MINUTES).contains(&v) => Ok(v),
            _ => {
                tracing::warn!("session_ttl_minutes 配置非法({}), 使用默认值", raw);
                Ok(DEFAULT_SESSION_TTL_MINUTES)
            }
        }
    }

    async fn get_locale(&self) -> Result<String, ConfigError> {
        self.get_config_or_default(config_keys::LOCALE, DEFAULT_LOCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_digest_is_stable_hex() {
        let d = password_digest("secreto");
        assert_eq!(d.len(), 64);
        assert_eq!(d, password_digest("secreto"));
        assert_ne!(d, password_digest("Secreto"));
        assert!(d.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
