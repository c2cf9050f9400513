// ==========================================
// 酒店服务质量问卷 - 问卷 API
// ==========================================
// 职责: 问卷目录、答卷提交与评分、结果列表、CSV 导出
// 流程: 表单字段 → 校验 → 入库 → 均值 → 模糊推理 → 报告
// 红线: 结果列表/导出必须先通过管理员会话校验
// ==========================================

use crate::api::auth_api::AuthApi;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::survey::{
    survey_sections, NewSurveyResponse, SectionAverages, SurveyItems, SurveyResponse,
    SurveySection, ITEM_CODES, ITEM_MAX, ITEM_MIN,
};
use crate::domain::types::QualityLabel;
use crate::engine::{OutcomeStatus, QualityAssessment, QualityEvaluator, QualityOutcome};
use crate::i18n::t_with_args;
use crate::perf::PerfGuard;
use crate::repository::SurveyResponseRepository;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tracing::instrument;

/// 结果列表中的日期格式 (dd/mm/yy)
pub const RESULT_DATE_FORMAT: &str = "%d/%m/%y";

/// CSV 导出表头
pub const EXPORT_HEADER: [&str; 11] = [
    "id",
    "correo_electronico",
    "fecha",
    "desempeno",
    "eficiencia",
    "eficacia",
    "estabilidad",
    "prevencion",
    "calidad",
    "etiqueta",
    "estado",
];

/// 提交结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub id: i64,
    pub crisp: f64,
    pub label: QualityLabel,
    pub inputs: SectionAverages,
    pub status: OutcomeStatus,
}

/// 结果列表行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub id: i64,
    pub correo_electronico: String,
    /// dd/mm/yy
    pub fecha: String,
    pub crisp: f64,
    pub etiqueta: QualityLabel,
    pub inputs: SectionAverages,
    pub status: OutcomeStatus,
}

impl ResultRow {
    fn from_outcome(response: &SurveyResponse, outcome: QualityOutcome) -> Self {
        Self {
            id: response.id,
            correo_electronico: response.correo_electronico.clone(),
            fecha: response
                .fecha_respuesta
                .format(RESULT_DATE_FORMAT)
                .to_string(),
            crisp: outcome.crisp,
            etiqueta: outcome.label,
            inputs: outcome.inputs,
            status: outcome.status,
        }
    }

    fn status_code(&self) -> &'static str {
        match self.status {
            OutcomeStatus::Computed => "COMPUTED",
            OutcomeStatus::Fallback { .. } => "FALLBACK",
        }
    }
}

// ==========================================
// 表单解析
// ==========================================

/// 把原始表单字段解析为 14 个题目得分
///
/// 每个题目代码必须出现,且能解析为 1..=9 的整数。
pub fn parse_form_items(fields: &HashMap<String, String>) -> ApiResult<SurveyItems> {
    let mut values = [0i32; 14];
    for (slot, code) in values.iter_mut().zip(ITEM_CODES.iter()) {
        let raw = fields
            .get(*code)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ApiError::InvalidInput(t_with_args("survey.missing_item", &[("code", *code)]))
            })?;

        let value = raw
            .parse::<i32>()
            .ok()
            .filter(|v| (ITEM_MIN..=ITEM_MAX).contains(v))
            .ok_or_else(|| {
                ApiError::InvalidInput(t_with_args(
                    "survey.invalid_item",
                    &[("code", *code), ("value", raw)],
                ))
            })?;
        *slot = value;
    }
    Ok(SurveyItems::from_values(values))
}

fn validate_email(email: &str) -> ApiResult<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(ApiError::InvalidInput(format!(
            "correo_electronico 非法: '{}'",
            email
        )));
    }
    Ok(trimmed.to_string())
}

// ==========================================
// SurveyApi - 问卷 API
// ==========================================
pub struct SurveyApi {
    repo: Arc<SurveyResponseRepository>,
    evaluator: Arc<QualityEvaluator>,
    auth: Arc<AuthApi>,
}

impl SurveyApi {
    pub fn new(
        repo: Arc<SurveyResponseRepository>,
        evaluator: Arc<QualityEvaluator>,
        auth: Arc<AuthApi>,
    ) -> Self {
        Self {
            repo,
            evaluator,
            auth,
        }
    }

    /// 问卷目录 (4 个分区,按展示顺序)
    pub fn list_sections(&self) -> Vec<SurveySection> {
        survey_sections()
    }

    /// 提交答卷: 校验 → 入库 → 评分
    ///
    /// 推理失败不会阻止入库,报告中的 status 会标记为 Fallback。
    #[instrument(skip(self, fields))]
    pub fn submit(
        &self,
        email: &str,
        fields: &HashMap<String, String>,
    ) -> ApiResult<SubmissionReport> {
        let email = validate_email(email)?;
        let items = parse_form_items(fields)?;

        let id = self.repo.insert(&NewSurveyResponse::new(email, items))?;
        let outcome = self.evaluator.evaluate(&items);

        tracing::info!(
            id,
            crisp = outcome.crisp,
            label = %outcome.label,
            fallback = outcome.is_fallback(),
            "答卷已提交"
        );

        Ok(SubmissionReport {
            id,
            crisp: outcome.crisp,
            label: outcome.label,
            inputs: outcome.inputs,
            status: outcome.status,
        })
    }

    /// 直接对 5 个均值评分 (严格模式,不降级)
    pub fn score_averages(&self, averages: &SectionAverages) -> ApiResult<QualityAssessment> {
        Ok(self.evaluator.engine().compute_quality(averages)?)
    }

    /// 对已存答卷重新评分
    pub fn evaluate_response(&self, id: i64) -> ApiResult<ResultRow> {
        let response = self
            .repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("答卷(id={})不存在", id)))?;
        let outcome = self.evaluator.evaluate(&response.items);
        Ok(ResultRow::from_outcome(&response, outcome))
    }

    /// 全部答卷及其评分 (需管理员会话)
    #[instrument(skip(self, token))]
    pub fn list_results(&self, token: &str) -> ApiResult<Vec<ResultRow>> {
        self.auth.require_session(token)?;
        let _perf = PerfGuard::new("list_results");
        self.collect_rows()
    }

    /// 导出 CSV (需管理员会话)
    ///
    /// # 返回
    /// - Ok(usize): 导出的数据行数 (不含表头)
    #[instrument(skip(self, token, writer))]
    pub fn export_results_csv<W: Write>(&self, token: &str, writer: W) -> ApiResult<usize> {
        self.auth.require_session(token)?;
        let _perf = PerfGuard::new("export_results_csv");

        let rows = self.collect_rows()?;
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(EXPORT_HEADER)?;
        for row in &rows {
            wtr.write_record([
                row.id.to_string(),
                row.correo_electronico.clone(),
                row.fecha.clone(),
                format!("{:.2}", row.inputs.desempeno),
                format!("{:.2}", row.inputs.eficiencia),
                format!("{:.2}", row.inputs.eficacia),
                format!("{:.2}", row.inputs.estabilidad),
                format!("{:.2}", row.inputs.prevencion),
                format!("{:.2}", row.crisp),
                row.etiqueta.to_string(),
                row.status_code().to_string(),
            ])?;
        }
        wtr.flush()
            .map_err(|e| ApiError::ExportError(e.to_string()))?;

        tracing::info!(count = rows.len(), "结果已导出");
        Ok(rows.len())
    }

    fn collect_rows(&self) -> ApiResult<Vec<ResultRow>> {
        let responses = self.repo.list_all()?;
        Ok(responses
            .iter()
            .map(|r| ResultRow::from_outcome(r, self.evaluator.evaluate(&r.items)))
            .collect())
    }
}
