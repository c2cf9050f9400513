// ==========================================
// 酒店服务质量问卷 - 配置读取 Trait
// ==========================================
// 职责: 定义管理入口与展示所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// SurveyConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait SurveyConfigReader: Send + Sync {
    /// 获取管理员口令的 SHA-256 摘要（小写十六进制）
    ///
    /// # 返回
    /// - Some(String): 已配置
    /// - None: 未配置（此时管理员登录一律拒绝）
    async fn get_admin_password_digest(&self) -> Result<Option<String>, Box<dyn Error + Send + Sync>>;

    /// 获取管理员会话有效期（分钟）
    ///
    /// # 默认值
    /// - 60
    async fn get_session_ttl_minutes(&self) -> Result<i64, Box<dyn Error + Send + Sync>>;

    /// 获取界面语言
    ///
    /// # 默认值
    /// - "es"
    async fn get_locale(&self) -> Result<String, Box<dyn Error + Send + Sync>>;
}
