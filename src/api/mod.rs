// ==========================================
// 酒店服务质量问卷 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 CLI 命令调用
// ==========================================

pub mod auth_api;
pub mod error;
pub mod survey_api;

// 重导出核心类型
pub use auth_api::{AdminSession, AuthApi};
pub use error::{ApiError, ApiResult};
pub use survey_api::{parse_form_items, ResultRow, SubmissionReport, SurveyApi};
