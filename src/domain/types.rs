// ==========================================
// 酒店服务质量问卷 - 领域类型定义
// ==========================================
// 输入变量: 5 个问卷分区均值 (固定槽位)
// 输出变量: 质量等级 calidad (5 档)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 输入变量 (Input Variable)
// ==========================================
// 红线: 槽位固定为 5 个,不允许动态增加
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputVariable {
    Desempeno,   // 性能 (A 区)
    Eficiencia,  // 效率 (B 区)
    Eficacia,    // 效果 (C 区)
    Estabilidad, // 稳定性 (D 区)
    Prevencion,  // 风险预防 (E 区)
}

impl InputVariable {
    /// 固定顺序的全部输入变量
    pub const ALL: [InputVariable; 5] = [
        InputVariable::Desempeno,
        InputVariable::Eficiencia,
        InputVariable::Eficacia,
        InputVariable::Estabilidad,
        InputVariable::Prevencion,
    ];

    /// 变量名 (与问卷/存储口径一致)
    pub fn name(&self) -> &'static str {
        match self {
            InputVariable::Desempeno => "desempeno",
            InputVariable::Eficiencia => "eficiencia",
            InputVariable::Eficacia => "eficacia",
            InputVariable::Estabilidad => "estabilidad",
            InputVariable::Prevencion => "prevencion",
        }
    }

    /// 槽位下标 (0..5)
    pub fn index(&self) -> usize {
        match self {
            InputVariable::Desempeno => 0,
            InputVariable::Eficiencia => 1,
            InputVariable::Eficacia => 2,
            InputVariable::Estabilidad => 3,
            InputVariable::Prevencion => 4,
        }
    }
}

impl fmt::Display for InputVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ==========================================
// 输入语言项 (Input Term)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputTerm {
    Bajo,  // 低
    Medio, // 中
    Alto,  // 高
}

impl InputTerm {
    pub const ALL: [InputTerm; 3] = [InputTerm::Bajo, InputTerm::Medio, InputTerm::Alto];

    pub fn key(&self) -> &'static str {
        match self {
            InputTerm::Bajo => "bajo",
            InputTerm::Medio => "medio",
            InputTerm::Alto => "alto",
        }
    }
}

impl fmt::Display for InputTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ==========================================
// 质量等级 (Quality Label)
// ==========================================
// 顺序即优先级: 并列时排在前面的等级胜出
// 序列化格式: 展示文本 ("Muy bajo" 等)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityLabel {
    #[serde(rename = "Muy bajo")]
    MuyBajo,
    #[serde(rename = "Bajo")]
    Bajo,
    #[serde(rename = "Medio")]
    Medio,
    #[serde(rename = "Alto")]
    Alto,
    #[serde(rename = "Muy alto")]
    MuyAlto,
}

impl QualityLabel {
    /// 固定顺序的全部等级 (muy_bajo → muy_alto)
    pub const ALL: [QualityLabel; 5] = [
        QualityLabel::MuyBajo,
        QualityLabel::Bajo,
        QualityLabel::Medio,
        QualityLabel::Alto,
        QualityLabel::MuyAlto,
    ];

    /// 知识库中的集合名
    pub fn key(&self) -> &'static str {
        match self {
            QualityLabel::MuyBajo => "muy_bajo",
            QualityLabel::Bajo => "bajo",
            QualityLabel::Medio => "medio",
            QualityLabel::Alto => "alto",
            QualityLabel::MuyAlto => "muy_alto",
        }
    }

    /// 展示文本: 下划线换空格,首字母大写
    pub fn display_name(&self) -> String {
        let spaced = self.key().replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// 从集合名或展示文本解析
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(' ', "_");
        QualityLabel::ALL
            .iter()
            .copied()
            .find(|label| label.key() == normalized)
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
