// ==========================================
// 酒店服务质量问卷 - 模糊推理子模块
// ==========================================
// membership:     论域 + 隶属函数
// knowledge_base: 语言变量 + 规则库 (只读)
// inference:      推理引擎 (每次调用独立工作状态)
// ==========================================

pub mod inference;
pub mod knowledge_base;
pub mod membership;

pub use inference::{FuzzyQualityEngine, QualityAssessment, RuleActivation};
pub use knowledge_base::{Antecedent, FuzzyRule, LinguisticVariable, QualityKnowledgeBase};
pub use membership::{MembershipFunction, Universe, UNIVERSE_MAX, UNIVERSE_MIN};
