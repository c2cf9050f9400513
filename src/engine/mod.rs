// ==========================================
// 酒店服务质量问卷 - 引擎层
// ==========================================
// 职责: 分区均值 + 模糊推理 + 质量评估
// 红线: Engine 不拼 SQL;推理失败必须显式返回
// ==========================================

pub mod averaging;
pub mod error;
pub mod fuzzy;
pub mod quality;

// 重导出核心引擎
pub use averaging::{compute_section_averages, section_average, validate_items};
pub use error::{QualityError, QualityResult};
pub use fuzzy::{
    FuzzyQualityEngine, MembershipFunction, QualityAssessment, QualityKnowledgeBase,
    RuleActivation, Universe,
};
pub use quality::{
    OutcomeStatus, QualityEvaluator, QualityOutcome, FALLBACK_CRISP, FALLBACK_LABEL,
};

/// 四舍五入到 2 位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn test_round2() {
        assert_eq!(round2(6.617647), 6.62);
        assert_eq!(round2(9.336666), 9.34);
        assert_eq!(round2(8.25), 8.25);
    }
}
