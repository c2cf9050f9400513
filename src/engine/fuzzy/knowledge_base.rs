// ==========================================
// 酒店服务质量问卷 - 模糊知识库
// ==========================================
// 内容: 语言变量 + 隶属函数断点 + 7 条规则
// 生命周期: 进程启动时构建一次,此后只读
// 红线: 断点与规则为固定知识,不允许运行时修改
// ==========================================

use crate::domain::types::{InputTerm, InputVariable, QualityLabel};
use crate::engine::fuzzy::membership::{MembershipFunction, Universe};
use std::sync::{Arc, OnceLock};

// ===== 输入集合 (5 个输入变量共用) =====
const INPUT_BAJO: MembershipFunction = MembershipFunction::fixed(1.0, 1.0, 3.0, 4.5);
const INPUT_MEDIO: MembershipFunction = MembershipFunction::fixed(3.5, 5.5, 5.5, 7.5);
const INPUT_ALTO: MembershipFunction = MembershipFunction::fixed(6.5, 8.0, 10.0, 10.0);

// ===== 输出集合 (calidad) =====
const OUTPUT_MUY_BAJO: MembershipFunction = MembershipFunction::fixed(1.0, 1.0, 1.0, 3.0);
const OUTPUT_BAJO: MembershipFunction = MembershipFunction::fixed(2.0, 4.0, 4.0, 6.0);
const OUTPUT_MEDIO: MembershipFunction = MembershipFunction::fixed(4.0, 6.0, 6.0, 8.0);
const OUTPUT_ALTO: MembershipFunction = MembershipFunction::fixed(6.0, 8.0, 8.0, 9.0);
const OUTPUT_MUY_ALTO: MembershipFunction = MembershipFunction::fixed(8.0, 10.0, 10.0, 10.0);

/// 输出变量名
pub const OUTPUT_VARIABLE_NAME: &str = "hotel_calidad_servicio";

// ==========================================
// LinguisticVariable - 语言变量
// ==========================================
#[derive(Debug, Clone)]
pub struct LinguisticVariable<T> {
    name: &'static str,
    terms: Vec<(T, MembershipFunction)>,
}

impl<T: Copy + PartialEq> LinguisticVariable<T> {
    pub fn new(name: &'static str, terms: Vec<(T, MembershipFunction)>) -> Self {
        Self { name, terms }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 按定义顺序的语言项
    pub fn terms(&self) -> &[(T, MembershipFunction)] {
        &self.terms
    }

    pub fn function(&self, term: T) -> Option<&MembershipFunction> {
        self.terms.iter().find(|(t, _)| *t == term).map(|(_, mf)| mf)
    }

    /// 隶属度 (未定义的语言项视为 0)
    pub fn degree(&self, term: T, x: f64) -> f64 {
        self.function(term).map(|mf| mf.degree(x)).unwrap_or(0.0)
    }
}

// ==========================================
// Antecedent - 规则前件表达式
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum Antecedent {
    /// 变量 IS 语言项
    Is(InputVariable, InputTerm),
    /// 模糊与 (min)
    And(Vec<Antecedent>),
    /// 模糊或 (max)
    Or(Vec<Antecedent>),
}

impl Antecedent {
    /// 按前件结构求值,叶子节点的隶属度由 `degree_of` 提供
    pub fn evaluate<F>(&self, degree_of: &F) -> f64
    where
        F: Fn(InputVariable, InputTerm) -> f64,
    {
        match self {
            Antecedent::Is(var, term) => degree_of(*var, *term),
            Antecedent::And(parts) => parts
                .iter()
                .map(|p| p.evaluate(degree_of))
                .fold(1.0, f64::min),
            Antecedent::Or(parts) => parts
                .iter()
                .map(|p| p.evaluate(degree_of))
                .fold(0.0, f64::max),
        }
    }
}

fn is(var: InputVariable, term: InputTerm) -> Antecedent {
    Antecedent::Is(var, term)
}

// ==========================================
// FuzzyRule - 模糊规则
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyRule {
    pub antecedent: Antecedent,
    pub consequent: QualityLabel,
}

impl FuzzyRule {
    pub fn new(antecedent: Antecedent, consequent: QualityLabel) -> Self {
        Self {
            antecedent,
            consequent,
        }
    }
}

/// 固定规则库 (顺序与评估顺序一致)
fn standard_rules() -> Vec<FuzzyRule> {
    use InputTerm::{Alto, Bajo, Medio};
    use InputVariable::{Desempeno, Eficacia, Eficiencia, Estabilidad, Prevencion};

    vec![
        // R1: 五项全高 → 很高
        FuzzyRule::new(
            Antecedent::And(vec![
                is(Desempeno, Alto),
                is(Eficiencia, Alto),
                is(Eficacia, Alto),
                is(Estabilidad, Alto),
                is(Prevencion, Alto),
            ]),
            QualityLabel::MuyAlto,
        ),
        // R2: 前三项高 且 (稳定性中 或 预防中) → 高
        FuzzyRule::new(
            Antecedent::And(vec![
                Antecedent::And(vec![
                    is(Desempeno, Alto),
                    is(Eficiencia, Alto),
                    is(Eficacia, Alto),
                ]),
                Antecedent::Or(vec![is(Estabilidad, Medio), is(Prevencion, Medio)]),
            ]),
            QualityLabel::Alto,
        ),
        // R3
        FuzzyRule::new(
            Antecedent::Or(vec![is(Estabilidad, Medio), is(Prevencion, Medio)]),
            QualityLabel::Medio,
        ),
        // R4
        FuzzyRule::new(
            Antecedent::And(vec![
                is(Desempeno, Medio),
                is(Eficiencia, Medio),
                is(Eficacia, Medio),
            ]),
            QualityLabel::Medio,
        ),
        // R5
        FuzzyRule::new(
            Antecedent::Or(vec![is(Prevencion, Bajo), is(Estabilidad, Bajo)]),
            QualityLabel::Bajo,
        ),
        // R6
        FuzzyRule::new(
            Antecedent::Or(vec![
                is(Desempeno, Bajo),
                is(Eficiencia, Bajo),
                is(Eficacia, Bajo),
            ]),
            QualityLabel::Bajo,
        ),
        // R7: 性能、效率、预防同时低 → 很低
        FuzzyRule::new(
            Antecedent::And(vec![
                is(Desempeno, Bajo),
                is(Eficiencia, Bajo),
                is(Prevencion, Bajo),
            ]),
            QualityLabel::MuyBajo,
        ),
    ]
}

// ==========================================
// QualityKnowledgeBase - 不可变知识库
// ==========================================
#[derive(Debug, Clone)]
pub struct QualityKnowledgeBase {
    universe: Universe,
    inputs: Vec<(InputVariable, LinguisticVariable<InputTerm>)>,
    output: LinguisticVariable<QualityLabel>,
    rules: Vec<FuzzyRule>,
    // 输出集合在论域上的预采样,按 QualityLabel::ALL 顺序
    output_samples: Vec<Vec<f64>>,
}

static SHARED_KNOWLEDGE_BASE: OnceLock<Arc<QualityKnowledgeBase>> = OnceLock::new();

impl QualityKnowledgeBase {
    /// 构建标准知识库
    pub fn standard() -> Self {
        let universe = Universe::standard();

        let inputs = InputVariable::ALL
            .iter()
            .map(|var| {
                (
                    *var,
                    LinguisticVariable::new(
                        var.name(),
                        vec![
                            (InputTerm::Bajo, INPUT_BAJO),
                            (InputTerm::Medio, INPUT_MEDIO),
                            (InputTerm::Alto, INPUT_ALTO),
                        ],
                    ),
                )
            })
            .collect();

        let output = LinguisticVariable::new(
            OUTPUT_VARIABLE_NAME,
            vec![
                (QualityLabel::MuyBajo, OUTPUT_MUY_BAJO),
                (QualityLabel::Bajo, OUTPUT_BAJO),
                (QualityLabel::Medio, OUTPUT_MEDIO),
                (QualityLabel::Alto, OUTPUT_ALTO),
                (QualityLabel::MuyAlto, OUTPUT_MUY_ALTO),
            ],
        );

        let output_samples = QualityLabel::ALL
            .iter()
            .map(|label| {
                output
                    .function(*label)
                    .map(|mf| mf.sample(&universe))
                    .unwrap_or_else(|| vec![0.0; universe.len()])
            })
            .collect();

        let rules = standard_rules();
        tracing::debug!(
            universe_points = universe.len(),
            rule_count = rules.len(),
            "模糊知识库构建完成"
        );

        Self {
            universe,
            inputs,
            output,
            rules,
            output_samples,
        }
    }

    /// 进程级共享知识库 (首次访问时构建)
    pub fn shared() -> Arc<QualityKnowledgeBase> {
        SHARED_KNOWLEDGE_BASE
            .get_or_init(|| Arc::new(QualityKnowledgeBase::standard()))
            .clone()
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn input(&self, variable: InputVariable) -> Option<&LinguisticVariable<InputTerm>> {
        self.inputs
            .iter()
            .find(|(v, _)| *v == variable)
            .map(|(_, lv)| lv)
    }

    pub fn output(&self) -> &LinguisticVariable<QualityLabel> {
        &self.output
    }

    pub fn rules(&self) -> &[FuzzyRule] {
        &self.rules
    }

    /// 输出集合的论域采样
    pub fn output_samples(&self, label: QualityLabel) -> &[f64] {
        let idx = QualityLabel::ALL
            .iter()
            .position(|l| *l == label)
            .unwrap_or(0);
        &self.output_samples[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_breakpoints_are_valid() {
        for mf in [
            INPUT_BAJO,
            INPUT_MEDIO,
            INPUT_ALTO,
            OUTPUT_MUY_BAJO,
            OUTPUT_BAJO,
            OUTPUT_MEDIO,
            OUTPUT_ALTO,
            OUTPUT_MUY_ALTO,
        ] {
            let [a, b, c, d] = mf.breakpoints();
            assert!(MembershipFunction::trapezoid(a, b, c, d).is_ok());
        }
    }

    #[test]
    fn test_standard_shape() {
        let kb = QualityKnowledgeBase::standard();
        assert_eq!(kb.rules().len(), 7);
        assert_eq!(kb.output().terms().len(), 5);
        for var in InputVariable::ALL {
            let lv = kb.input(var).expect("输入变量缺失");
            assert_eq!(lv.name(), var.name());
            assert_eq!(lv.terms().len(), 3);
        }
        for label in QualityLabel::ALL {
            assert_eq!(kb.output_samples(label).len(), kb.universe().len());
        }
    }

    #[test]
    fn test_antecedent_min_max() {
        let expr = Antecedent::And(vec![
            is(InputVariable::Desempeno, InputTerm::Alto),
            Antecedent::Or(vec![
                is(InputVariable::Estabilidad, InputTerm::Medio),
                is(InputVariable::Prevencion, InputTerm::Medio),
            ]),
        ]);
        let degrees = |var: InputVariable, _term: InputTerm| match var {
            InputVariable::Desempeno => 0.8,
            InputVariable::Estabilidad => 0.3,
            InputVariable::Prevencion => 0.6,
            _ => 0.0,
        };
        assert!((expr.evaluate(&degrees) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_shared_is_singleton() {
        let a = QualityKnowledgeBase::shared();
        let b = QualityKnowledgeBase::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
