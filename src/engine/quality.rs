// ==========================================
// 酒店服务质量问卷 - 质量评估器
// ==========================================
// 职责: 均值计算 + 模糊推理 + 降级策略
// 降级: crisp=5.0, 等级=Medio,并以 OutcomeStatus::Fallback 显式标记
// 红线: 降级必须可被调用方识别,不允许静默吞错
// ==========================================

use crate::domain::survey::{SectionAverages, SurveyItems};
use crate::domain::types::QualityLabel;
use crate::engine::averaging::compute_section_averages;
use crate::engine::error::QualityResult;
use crate::engine::fuzzy::{FuzzyQualityEngine, QualityAssessment};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 降级评分
pub const FALLBACK_CRISP: f64 = 5.0;
/// 降级等级
pub const FALLBACK_LABEL: QualityLabel = QualityLabel::Medio;

/// 评估状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    /// 正常推理
    Computed,
    /// 推理失败,已使用降级值
    Fallback { reason: String },
}

/// 评估结果 (永不失败)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityOutcome {
    pub crisp: f64,
    pub label: QualityLabel,
    pub inputs: SectionAverages,
    pub status: OutcomeStatus,
}

impl QualityOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.status, OutcomeStatus::Fallback { .. })
    }

    fn computed(assessment: QualityAssessment) -> Self {
        Self {
            crisp: assessment.crisp,
            label: assessment.label,
            inputs: assessment.inputs,
            status: OutcomeStatus::Computed,
        }
    }

    fn fallback(inputs: SectionAverages, reason: String) -> Self {
        Self {
            crisp: FALLBACK_CRISP,
            label: FALLBACK_LABEL,
            inputs,
            status: OutcomeStatus::Fallback { reason },
        }
    }
}

// ==========================================
// QualityEvaluator - 质量评估器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct QualityEvaluator {
    engine: FuzzyQualityEngine,
}

impl QualityEvaluator {
    pub fn new(engine: FuzzyQualityEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &FuzzyQualityEngine {
        &self.engine
    }

    /// 严格评估: 任何错误直接返回
    pub fn evaluate_strict(&self, items: &SurveyItems) -> QualityResult<QualityAssessment> {
        let averages = compute_section_averages(items)?;
        self.engine.compute_quality(&averages)
    }

    /// 带降级的评估
    ///
    /// 均值可计算时回显真实均值,否则回显全零。
    #[instrument(skip(self, items))]
    pub fn evaluate(&self, items: &SurveyItems) -> QualityOutcome {
        let averages = match compute_section_averages(items) {
            Ok(avg) => avg,
            Err(e) => {
                tracing::warn!(error = %e, "分区均值计算失败,使用降级评分");
                return QualityOutcome::fallback(SectionAverages::zeroed(), e.to_string());
            }
        };

        match self.engine.compute_quality(&averages) {
            Ok(assessment) => QualityOutcome::computed(assessment),
            Err(e) => {
                tracing::warn!(error = %e, inputs = ?averages, "模糊推理失败,使用降级评分");
                QualityOutcome::fallback(averages, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_computed() {
        let evaluator = QualityEvaluator::default();
        let items = SurveyItems::from_values([9; 14]);
        let outcome = evaluator.evaluate(&items);
        assert_eq!(outcome.status, OutcomeStatus::Computed);
        assert_eq!(outcome.label, QualityLabel::MuyAlto);
        assert_eq!(outcome.inputs.desempeno, 9.0);
    }

    #[test]
    fn test_evaluate_falls_back_when_no_rule_fires() {
        // eficacia = 5.67 只属于 medio,其余四项只属于 alto: 7 条规则全部为 0
        let items = SurveyItems::from_values([9, 9, 9, 9, 9, 9, 9, 6, 5, 6, 9, 9, 9, 9]);
        let outcome = evaluator_outcome(&items);
        assert!(outcome.is_fallback());
        assert_eq!(outcome.crisp, FALLBACK_CRISP);
        assert_eq!(outcome.label, QualityLabel::Medio);
        assert_eq!(outcome.inputs.eficacia, 5.67);
    }

    #[test]
    fn test_evaluate_falls_back_on_invalid_items() {
        let items = SurveyItems::from_values([0; 14]);
        let outcome = evaluator_outcome(&items);
        assert!(outcome.is_fallback());
        assert_eq!(outcome.inputs, SectionAverages::zeroed());
    }

    #[test]
    fn test_evaluate_strict_surfaces_error() {
        let items = SurveyItems::from_values([9, 9, 9, 9, 9, 9, 9, 6, 5, 6, 9, 9, 9, 9]);
        assert!(QualityEvaluator::default().evaluate_strict(&items).is_err());
    }

    fn evaluator_outcome(items: &SurveyItems) -> QualityOutcome {
        QualityEvaluator::default().evaluate(items)
    }
}
