// ==========================================
// 酒店服务质量问卷 - 问卷领域模型
// ==========================================
// 职责: 问卷题目目录、答卷实体、分区均值
// 红线: 不含数据访问逻辑,不含推理逻辑
// ==========================================

use crate::domain::types::InputVariable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 14 个题目编码 (表单字段名 / 存储列名),按问卷顺序
pub const ITEM_CODES: [&str; 14] = [
    "a1", "a2", "a3", "a4", "b1", "b2", "b3", "c1", "c2", "c3", "d1", "d2", "e1", "e2",
];

/// 单题评分下限
pub const ITEM_MIN: i32 = 1;
/// 单题评分上限
pub const ITEM_MAX: i32 = 9;

// ==========================================
// SurveyItems - 14 题原始评分
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyItems {
    // ===== A 区: 性能 =====
    pub a1: i32,
    pub a2: i32,
    pub a3: i32,
    pub a4: i32,
    // ===== B 区: 效率 =====
    pub b1: i32,
    pub b2: i32,
    pub b3: i32,
    // ===== C 区: 效果 =====
    pub c1: i32,
    pub c2: i32,
    pub c3: i32,
    // ===== D 区: 稳定性 =====
    pub d1: i32,
    pub d2: i32,
    // ===== E 区: 风险预防 =====
    pub e1: i32,
    pub e2: i32,
}

impl SurveyItems {
    /// 按 ITEM_CODES 顺序构造
    pub fn from_values(v: [i32; 14]) -> Self {
        Self {
            a1: v[0],
            a2: v[1],
            a3: v[2],
            a4: v[3],
            b1: v[4],
            b2: v[5],
            b3: v[6],
            c1: v[7],
            c2: v[8],
            c3: v[9],
            d1: v[10],
            d2: v[11],
            e1: v[12],
            e2: v[13],
        }
    }

    /// 按 ITEM_CODES 顺序输出
    pub fn values(&self) -> [i32; 14] {
        [
            self.a1, self.a2, self.a3, self.a4, self.b1, self.b2, self.b3, self.c1, self.c2,
            self.c3, self.d1, self.d2, self.e1, self.e2,
        ]
    }

    /// 按题目编码取值
    pub fn get(&self, code: &str) -> Option<i32> {
        ITEM_CODES
            .iter()
            .position(|c| *c == code)
            .map(|idx| self.values()[idx])
    }

    /// 某个输入变量对应的分区题目 (编码, 评分)
    pub fn section(&self, variable: InputVariable) -> Vec<(&'static str, i32)> {
        let prefix = match variable {
            InputVariable::Desempeno => 'a',
            InputVariable::Eficiencia => 'b',
            InputVariable::Eficacia => 'c',
            InputVariable::Estabilidad => 'd',
            InputVariable::Prevencion => 'e',
        };
        ITEM_CODES
            .iter()
            .zip(self.values())
            .filter(|(code, _)| code.starts_with(prefix))
            .map(|(code, value)| (*code, value))
            .collect()
    }
}

// ==========================================
// SectionAverages - 5 个分区均值
// ==========================================
// 既是推理引擎的输入槽位,也是回显给调用方的输入映射
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionAverages {
    pub desempeno: f64,
    pub eficiencia: f64,
    pub eficacia: f64,
    pub estabilidad: f64,
    pub prevencion: f64,
}

impl SectionAverages {
    pub fn new(
        desempeno: f64,
        eficiencia: f64,
        eficacia: f64,
        estabilidad: f64,
        prevencion: f64,
    ) -> Self {
        Self {
            desempeno,
            eficiencia,
            eficacia,
            estabilidad,
            prevencion,
        }
    }

    /// 全零均值 (无法计算均值时的回显值)
    pub fn zeroed() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }

    pub fn get(&self, variable: InputVariable) -> f64 {
        match variable {
            InputVariable::Desempeno => self.desempeno,
            InputVariable::Eficiencia => self.eficiencia,
            InputVariable::Eficacia => self.eficacia,
            InputVariable::Estabilidad => self.estabilidad,
            InputVariable::Prevencion => self.prevencion,
        }
    }
}

// ==========================================
// SurveyResponse - 答卷
// ==========================================
// 对齐: respuesta_encuesta 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: i64,
    pub correo_electronico: String,
    pub fecha_respuesta: DateTime<Utc>,
    pub items: SurveyItems,
}

/// 待写入的答卷 (id 由数据库分配)
#[derive(Debug, Clone)]
pub struct NewSurveyResponse {
    pub correo_electronico: String,
    pub fecha_respuesta: DateTime<Utc>,
    pub items: SurveyItems,
}

impl NewSurveyResponse {
    pub fn new(correo_electronico: impl Into<String>, items: SurveyItems) -> Self {
        Self {
            correo_electronico: correo_electronico.into(),
            fecha_respuesta: Utc::now(),
            items,
        }
    }
}

// ==========================================
// 问卷目录
// ==========================================

#[derive(Debug, Clone, Serialize)]
pub struct SurveyQuestion {
    pub code: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveySection {
    pub title: &'static str,
    pub questions: Vec<SurveyQuestion>,
}

fn q(code: &'static str, text: &'static str) -> SurveyQuestion {
    SurveyQuestion { code, text }
}

/// 问卷分区与题目 (展示顺序)
pub fn survey_sections() -> Vec<SurveySection> {
    vec![
        SurveySection {
            title: "Sección A. Desempeño",
            questions: vec![
                q("a1", "A.1. Limpieza de la habitación"),
                q("a2", "A.2. Confort de la estancia"),
                q("a3", "A.3. Agilidad en el check-in/out"),
                q("a4", "A.4. Estado de instalaciones"),
            ],
        },
        SurveySection {
            title: "Sección B. Eficiencia",
            questions: vec![
                q("b1", "B.1. Rapidez en la atención"),
                q("b2", "B.2. Tiempo de respuesta"),
                q("b3", "B.3. Ausencia de retrasos"),
            ],
        },
        SurveySection {
            title: "Sección C. Eficacia",
            questions: vec![
                q("c1", "C.1. Correspondencia con oferta"),
                q("c2", "C.2. Cumplimiento de expectativas"),
                q("c3", "C.3. Ejecución de servicios"),
            ],
        },
        SurveySection {
            title: "Sección D y E. Estabilidad y Riesgos",
            questions: vec![
                q("d1", "D.1. Constancia en calidad"),
                q("d2", "D.2. Estabilidad del servicio"),
                q("e1", "E.1. Ausencia de inconvenientes"),
                q("e2", "E.2. Resolución de situaciones"),
            ],
        },
    ]
}
