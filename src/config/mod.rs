// ==========================================
// 酒店服务质量问卷 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod survey_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, password_digest, ConfigManager};
pub use survey_config_trait::SurveyConfigReader;
