// ==========================================
// 酒店服务质量问卷 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{AuthApi, SurveyApi};
use crate::config::{ConfigManager, SurveyConfigReader};
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::QualityEvaluator;
use crate::perf::install_sqlite_tracing;
use crate::repository::SurveyResponseRepository;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "HOTEL_FUZZY_QUALITY_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 答卷仓储
    pub survey_repo: Arc<SurveyResponseRepository>,

    /// 质量评估器 (共享只读知识库)
    pub evaluator: Arc<QualityEvaluator>,

    /// 管理员鉴权API
    pub auth_api: Arc<AuthApi>,

    /// 问卷API
    pub survey_api: Arc<SurveyApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并初始化 schema
    /// 2. 初始化 Repository 与 ConfigManager
    /// 3. 创建评估器与 API 实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let mut conn =
            open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("schema 初始化失败: {}", e))?;
        install_sqlite_tracing(&mut conn);
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层与配置层
        // ==========================================
        let survey_repo = Arc::new(SurveyResponseRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法初始化ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化Engine层与API层
        // ==========================================
        let evaluator = Arc::new(QualityEvaluator::default());
        let config_reader: Arc<dyn SurveyConfigReader> = config_manager.clone();
        let auth_api = Arc::new(AuthApi::new(config_reader));
        let survey_api = Arc::new(SurveyApi::new(
            survey_repo.clone(),
            evaluator.clone(),
            auth_api.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config_manager,
            survey_repo,
            evaluator,
            auth_api,
            survey_api,
        })
    }

    /// 按配置切换界面语言 (读取失败时保持默认语言)
    pub async fn apply_configured_locale(&self) {
        match self.config_manager.get_locale().await {
            Ok(locale) => {
                crate::i18n::set_locale(&locale);
            }
            Err(e) => tracing::warn!("读取 locale 配置失败: {}", e),
        }
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./hotel_fuzzy_quality.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("hotel-fuzzy-quality");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("hotel_fuzzy_quality.db");
        }
    }

    path.to_string_lossy().to_string()
}
