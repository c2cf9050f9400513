// ==========================================
// 酒店服务质量问卷 - 应用层
// ==========================================
// 职责: 组装共享连接、仓储、配置、引擎与 API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
