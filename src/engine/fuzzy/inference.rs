// ==========================================
// 酒店服务质量问卷 - 模糊推理引擎
// ==========================================
// 职责: 模糊化 → 规则激活 → 聚合 → 重心去模糊化 → 定级
// 输入: 5 个分区均值 (SectionAverages)
// 输出: QualityAssessment (crisp + 等级 + 回显输入 + 规则激活度)
// 红线: 引擎只持有只读知识库;每次调用独立的工作状态
// ==========================================

use crate::domain::survey::SectionAverages;
use crate::domain::types::{InputTerm, InputVariable, QualityLabel};
use crate::engine::error::{QualityError, QualityResult};
use crate::engine::fuzzy::knowledge_base::QualityKnowledgeBase;
use crate::engine::round2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// 输出结构
// ==========================================

/// 单条规则的激活情况
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleActivation {
    /// 规则序号 (从 1 开始)
    pub rule_no: usize,
    pub consequent: QualityLabel,
    pub firing_strength: f64,
}

/// 一次推理的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// 去模糊化结果 (保留 2 位小数)
    pub crisp: f64,
    pub label: QualityLabel,
    /// 回显的输入均值
    pub inputs: SectionAverages,
    pub activations: Vec<RuleActivation>,
}

// ==========================================
// InferenceState - 单次推理工作状态
// ==========================================
// 每次调用新建,调用结束即丢弃,不跨调用共享
struct InferenceState<'a> {
    kb: &'a QualityKnowledgeBase,
    inputs: SectionAverages,
    // [变量][语言项] 的隶属度
    degrees: [[f64; 3]; 5],
    firing: Vec<f64>,
    aggregated: Vec<f64>,
}

impl<'a> InferenceState<'a> {
    fn new(kb: &'a QualityKnowledgeBase, inputs: SectionAverages) -> Self {
        Self {
            kb,
            inputs,
            degrees: [[0.0; 3]; 5],
            firing: Vec::with_capacity(kb.rules().len()),
            aggregated: vec![0.0; kb.universe().len()],
        }
    }

    /// 模糊化: 计算每个输入在 3 个语言项上的隶属度 (不归一化)
    fn fuzzify(&mut self) {
        for var in InputVariable::ALL {
            let x = self.inputs.get(var);
            if let Some(lv) = self.kb.input(var) {
                for (t_idx, term) in InputTerm::ALL.iter().enumerate() {
                    self.degrees[var.index()][t_idx] = lv.degree(*term, x);
                }
            }
        }
    }

    fn degree(&self, var: InputVariable, term: InputTerm) -> f64 {
        let t_idx = match term {
            InputTerm::Bajo => 0,
            InputTerm::Medio => 1,
            InputTerm::Alto => 2,
        };
        self.degrees[var.index()][t_idx]
    }

    /// 规则激活: 每条规则独立求值
    fn fire_rules(&mut self) {
        let strengths: Vec<f64> = self
            .kb
            .rules()
            .iter()
            .map(|rule| {
                rule.antecedent
                    .evaluate(&|var: InputVariable, term: InputTerm| self.degree(var, term))
            })
            .collect();
        self.firing = strengths;
    }

    /// 聚合: 各规则按激活度截断后续集合,逐点取 max
    fn aggregate(&mut self) {
        for (rule, strength) in self.kb.rules().iter().zip(self.firing.iter()) {
            if *strength <= 0.0 {
                continue;
            }
            let samples = self.kb.output_samples(rule.consequent);
            for (acc, mu) in self.aggregated.iter_mut().zip(samples.iter()) {
                let clipped = mu.min(*strength);
                if clipped > *acc {
                    *acc = clipped;
                }
            }
        }
    }

    /// 重心法: Σ x·μ(x) / Σ μ(x)
    fn centroid(&self) -> QualityResult<f64> {
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (x, mu) in self.kb.universe().points().iter().zip(self.aggregated.iter()) {
            numerator += x * mu;
            denominator += mu;
        }
        if denominator <= 0.0 {
            return Err(QualityError::NoRuleFired);
        }
        Ok(numerator / denominator)
    }

    fn activations(&self) -> Vec<RuleActivation> {
        self.kb
            .rules()
            .iter()
            .zip(self.firing.iter())
            .enumerate()
            .map(|(idx, (rule, strength))| RuleActivation {
                rule_no: idx + 1,
                consequent: rule.consequent,
                firing_strength: *strength,
            })
            .collect()
    }
}

// ==========================================
// FuzzyQualityEngine - 模糊质量推理引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct FuzzyQualityEngine {
    kb: Arc<QualityKnowledgeBase>,
}

impl Default for FuzzyQualityEngine {
    fn default() -> Self {
        Self::new(QualityKnowledgeBase::shared())
    }
}

impl FuzzyQualityEngine {
    /// 创建推理引擎
    pub fn new(kb: Arc<QualityKnowledgeBase>) -> Self {
        Self { kb }
    }

    pub fn knowledge_base(&self) -> &QualityKnowledgeBase {
        &self.kb
    }

    /// 隶属度查询: membership(变量, 语言项, x)
    pub fn membership(&self, variable: InputVariable, term: InputTerm, x: f64) -> f64 {
        self.kb
            .input(variable)
            .map(|lv| lv.degree(term, x))
            .unwrap_or(0.0)
    }

    /// 输出变量隶属度
    pub fn output_membership(&self, label: QualityLabel, x: f64) -> f64 {
        self.kb.output().degree(label, x)
    }

    /// 输入校验: 5 个槽位必须是 [1, 10] 内的有限数值
    pub fn validate_inputs(&self, inputs: &SectionAverages) -> QualityResult<()> {
        let universe = self.kb.universe();
        for var in InputVariable::ALL {
            let value = inputs.get(var);
            if !value.is_finite() {
                return Err(QualityError::NonFiniteInput {
                    variable: var,
                    value,
                });
            }
            if !universe.contains(value) {
                return Err(QualityError::InputOutOfRange {
                    variable: var,
                    value,
                    min: universe.min(),
                    max: universe.max(),
                });
            }
        }
        Ok(())
    }

    /// 计算质量评分
    ///
    /// # 返回
    /// - Ok(QualityAssessment): crisp 已保留 2 位小数
    /// - Err(QualityError::NoRuleFired): 没有规则被激活 (重心无定义)
    /// - Err(QualityError::InputOutOfRange / NonFiniteInput): 输入非法
    #[instrument(skip(self), level = "debug")]
    pub fn compute_quality(&self, inputs: &SectionAverages) -> QualityResult<QualityAssessment> {
        self.validate_inputs(inputs)?;

        let mut state = InferenceState::new(&self.kb, *inputs);
        state.fuzzify();
        state.fire_rules();
        state.aggregate();

        let centroid = match state.centroid() {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(inputs = ?inputs, "聚合结果处处为 0");
                return Err(e);
            }
        };

        let crisp = round2(centroid);
        let label = self.label(crisp);

        Ok(QualityAssessment {
            crisp,
            label,
            inputs: *inputs,
            activations: state.activations(),
        })
    }

    /// 定级: 取 crisp 处隶属度最高的输出集合
    ///
    /// 并列时按 muy_bajo → muy_alto 顺序,靠前者胜出。
    pub fn label(&self, crisp: f64) -> QualityLabel {
        let mut best = QualityLabel::MuyBajo;
        let mut best_degree = f64::NEG_INFINITY;
        for label in QualityLabel::ALL {
            let degree = self.output_membership(label, crisp);
            if degree > best_degree {
                best = label;
                best_degree = degree;
            }
        }
        best
    }
}
