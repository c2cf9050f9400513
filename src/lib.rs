// ==========================================
// 酒店服务质量问卷 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 问卷采集 + 模糊推理评分
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 均值与模糊推理
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// SQL 计数与耗时统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{InputTerm, InputVariable, QualityLabel};

// 领域实体
pub use domain::{NewSurveyResponse, SectionAverages, SurveyItems, SurveyResponse};

// 引擎
pub use engine::{
    FuzzyQualityEngine, OutcomeStatus, QualityAssessment, QualityError, QualityEvaluator,
    QualityKnowledgeBase, QualityOutcome,
};

// API
pub use api::{AuthApi, SurveyApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Calidad de servicio hotelero";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
