// ==========================================
// 酒店服务质量问卷 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 引擎不吞错误,降级策略由调用方决定
// ==========================================

use crate::domain::types::InputVariable;
use thiserror::Error;

/// 推理引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QualityError {
    // ===== 输入校验错误 =====
    #[error("输入变量超出论域: {variable}={value} (允许范围 [{min}, {max}])")]
    InputOutOfRange {
        variable: InputVariable,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("输入变量不是有限数值: {variable}={value}")]
    NonFiniteInput { variable: InputVariable, value: f64 },

    #[error("题目评分超出范围: {item}={value} (允许范围 [{min}, {max}])")]
    ItemOutOfRange {
        item: String,
        value: i32,
        min: i32,
        max: i32,
    },

    // ===== 知识库错误 =====
    #[error("隶属函数断点非法: {0}")]
    InvalidMembershipFunction(String),

    // ===== 推理错误 =====
    /// 聚合后的输出模糊集处处为 0,重心无定义
    #[error("没有任何规则被激活,无法去模糊化")]
    NoRuleFired,
}

/// Result 类型别名
pub type QualityResult<T> = Result<T, QualityError>;
