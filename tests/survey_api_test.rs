// ==========================================
// SurveyApi / AuthApi 集成测试
// ==========================================
// 测试目标: 提交 → 入库 → 评分 → 管理员查看/导出 的完整流程
// ==========================================

mod test_helpers;

use hotel_fuzzy_quality::api::ApiError;
use hotel_fuzzy_quality::app::AppState;
use hotel_fuzzy_quality::engine::OutcomeStatus;
use hotel_fuzzy_quality::QualityLabel;
use test_helpers::{create_test_db, form_fields, no_rule_items, scenario_items};

fn setup() -> (tempfile::NamedTempFile, AppState) {
    hotel_fuzzy_quality::logging::init_test();
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).expect("Failed to create AppState");
    state
        .config_manager
        .set_admin_password("clave-admin")
        .expect("Failed to set admin password");
    (temp_file, state)
}

#[test]
fn test_submit_scores_and_persists() {
    let (_tmp, state) = setup();

    let report = state
        .survey_api
        .submit("huesped@example.com", &form_fields(&scenario_items()))
        .expect("submit failed");

    assert!(report.id > 0);
    assert_eq!(report.crisp, 6.62);
    assert_eq!(report.label, QualityLabel::Medio);
    assert_eq!(report.status, OutcomeStatus::Computed);
    assert_eq!(report.inputs.desempeno, 8.25);

    let stored = state
        .survey_repo
        .find_by_id(report.id)
        .expect("query failed")
        .expect("response should exist");
    assert_eq!(stored.items, scenario_items());
    assert_eq!(stored.correo_electronico, "huesped@example.com");
}

#[test]
fn test_submit_with_no_rule_fired_is_stored_with_fallback() {
    let (_tmp, state) = setup();

    let report = state
        .survey_api
        .submit("otro@example.com", &form_fields(&no_rule_items()))
        .expect("submit failed");

    assert_eq!(report.crisp, 5.0);
    assert_eq!(report.label, QualityLabel::Medio);
    assert!(matches!(report.status, OutcomeStatus::Fallback { .. }));
    assert_eq!(state.survey_repo.count().unwrap(), 1);
}

#[test]
fn test_invalid_submission_is_not_persisted() {
    let (_tmp, state) = setup();

    let mut form = form_fields(&scenario_items());
    let err = state.survey_api.submit("sin-arroba", &form).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    form.insert("b2".to_string(), "11".to_string());
    let err = state
        .survey_api
        .submit("huesped@example.com", &form)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    form.remove("b2");
    let err = state
        .survey_api
        .submit("huesped@example.com", &form)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    assert_eq!(state.survey_repo.count().unwrap(), 0);
}

#[test]
fn test_evaluate_response() {
    let (_tmp, state) = setup();
    let report = state
        .survey_api
        .submit("huesped@example.com", &form_fields(&scenario_items()))
        .unwrap();

    let row = state.survey_api.evaluate_response(report.id).unwrap();
    assert_eq!(row.crisp, report.crisp);
    assert_eq!(row.etiqueta, report.label);

    assert!(matches!(
        state.survey_api.evaluate_response(report.id + 1),
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_results_require_admin_session() {
    let (_tmp, state) = setup();

    assert!(matches!(
        state.survey_api.list_results("token-inventado"),
        Err(ApiError::Unauthorized(_))
    ));
    assert!(matches!(
        state.auth_api.login("incorrecta").await,
        Err(ApiError::Unauthorized(_))
    ));

    let session = state.auth_api.login("clave-admin").await.unwrap();
    assert!(state.survey_api.list_results(&session.token).is_ok());

    state.auth_api.logout(&session.token).unwrap();
    assert!(state.survey_api.list_results(&session.token).is_err());
}

#[tokio::test]
async fn test_list_results_rows() {
    let (_tmp, state) = setup();
    state
        .survey_api
        .submit("uno@example.com", &form_fields(&scenario_items()))
        .unwrap();
    state
        .survey_api
        .submit("dos@example.com", &form_fields(&no_rule_items()))
        .unwrap();

    let session = state.auth_api.login("clave-admin").await.unwrap();
    let rows = state.survey_api.list_results(&session.token).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].correo_electronico, "uno@example.com");
    assert_eq!(rows[0].etiqueta, QualityLabel::Medio);
    assert_eq!(rows[0].status, OutcomeStatus::Computed);
    assert!(matches!(rows[1].status, OutcomeStatus::Fallback { .. }));

    // dd/mm/yy
    let fecha = rows[0].fecha.as_bytes();
    assert_eq!(fecha.len(), 8);
    assert_eq!(fecha[2], b'/');
    assert_eq!(fecha[5], b'/');
}

#[tokio::test]
async fn test_export_results_csv() {
    let (_tmp, state) = setup();
    state
        .survey_api
        .submit("uno@example.com", &form_fields(&scenario_items()))
        .unwrap();
    state
        .survey_api
        .submit("dos@example.com", &form_fields(&no_rule_items()))
        .unwrap();

    let session = state.auth_api.login("clave-admin").await.unwrap();
    let mut buf: Vec<u8> = Vec::new();
    let count = state
        .survey_api
        .export_results_csv(&session.token, &mut buf)
        .unwrap();
    assert_eq!(count, 2);

    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "id,correo_electronico,fecha,desempeno,eficiencia,eficacia,estabilidad,prevencion,calidad,etiqueta,estado"
    );
    assert!(lines[1].starts_with("1,uno@example.com,"));
    assert!(lines[1].ends_with(",8.25,7.67,8.00,6.50,7.00,6.62,Medio,COMPUTED"));
    assert!(lines[2].ends_with(",9.00,9.00,5.67,9.00,9.00,5.00,Medio,FALLBACK"));

    let mut denied: Vec<u8> = Vec::new();
    assert!(state
        .survey_api
        .export_results_csv("token-inventado", &mut denied)
        .is_err());
    assert!(denied.is_empty());
}

#[test]
fn test_list_sections() {
    let (_tmp, state) = setup();
    let sections = state.survey_api.list_sections();
    assert_eq!(sections.len(), 4);
    let total: usize = sections.iter().map(|s| s.questions.len()).sum();
    assert_eq!(total, 14);
}

#[tokio::test]
async fn test_login_with_oversized_session_ttl_uses_default() {
    let (_tmp, state) = setup();
    state
        .config_manager
        .set_config_value("session_ttl_minutes", "9223372036854775807")
        .unwrap();

    let session = state.auth_api.login("clave-admin").await.unwrap();
    let ttl = session.expires_at - chrono::Utc::now();
    assert!(ttl <= chrono::Duration::minutes(60));
    assert!(ttl > chrono::Duration::minutes(59));
    assert!(state.survey_api.list_results(&session.token).is_ok());
}
