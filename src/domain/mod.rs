// ==========================================
// 酒店服务质量问卷 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod survey;
pub mod types;

// 重导出核心类型
pub use survey::{
    survey_sections, NewSurveyResponse, SectionAverages, SurveyItems, SurveyQuestion,
    SurveyResponse, SurveySection, ITEM_CODES, ITEM_MAX, ITEM_MIN,
};
pub use types::{InputTerm, InputVariable, QualityLabel};
