// ==========================================
// 酒店服务质量问卷 - 分区均值计算
// ==========================================
// 职责: 14 题原始评分 → 5 个分区均值 (保留 2 位小数)
// 位置: 存储层与推理引擎之间的边界适配
// 红线: 不含任何模糊逻辑
// ==========================================

use crate::domain::survey::{SectionAverages, SurveyItems, ITEM_MAX, ITEM_MIN};
use crate::domain::types::InputVariable;
use crate::engine::error::{QualityError, QualityResult};
use crate::engine::round2;

/// 题目评分校验 (1..=9)
pub fn validate_items(items: &SurveyItems) -> QualityResult<()> {
    for var in InputVariable::ALL {
        for (code, value) in items.section(var) {
            if !(ITEM_MIN..=ITEM_MAX).contains(&value) {
                return Err(QualityError::ItemOutOfRange {
                    item: code.to_string(),
                    value,
                    min: ITEM_MIN,
                    max: ITEM_MAX,
                });
            }
        }
    }
    Ok(())
}

/// 一组评分的均值,保留 2 位小数
///
/// 空集合返回 None
pub fn section_average(values: &[i32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: i32 = values.iter().sum();
    Some(round2(sum as f64 / values.len() as f64))
}

/// 计算 5 个分区均值
///
/// - desempeno: a1..a4
/// - eficiencia: b1..b3
/// - eficacia: c1..c3
/// - estabilidad: d1, d2
/// - prevencion: e1, e2
pub fn compute_section_averages(items: &SurveyItems) -> QualityResult<SectionAverages> {
    validate_items(items)?;

    let avg = |var: InputVariable| -> f64 {
        let values: Vec<i32> = items.section(var).into_iter().map(|(_, v)| v).collect();
        // 每个分区至少 2 题,不会为空
        section_average(&values).unwrap_or(0.0)
    };

    Ok(SectionAverages::new(
        avg(InputVariable::Desempeno),
        avg(InputVariable::Eficiencia),
        avg(InputVariable::Eficacia),
        avg(InputVariable::Estabilidad),
        avg(InputVariable::Prevencion),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_average_rounding() {
        assert_eq!(section_average(&[9, 9, 9, 9]), Some(9.0));
        assert_eq!(section_average(&[1, 5]), Some(3.0));
        assert_eq!(section_average(&[8, 8, 7]), Some(7.67));
        assert_eq!(section_average(&[7, 7, 8]), Some(7.33));
        assert_eq!(section_average(&[]), None);
    }

    #[test]
    fn test_compute_section_averages() {
        let items = SurveyItems::from_values([9, 8, 8, 8, 8, 8, 7, 8, 8, 8, 6, 7, 7, 7]);
        let avg = compute_section_averages(&items).unwrap();
        assert_eq!(avg.desempeno, 8.25);
        assert_eq!(avg.eficiencia, 7.67);
        assert_eq!(avg.eficacia, 8.0);
        assert_eq!(avg.estabilidad, 6.5);
        assert_eq!(avg.prevencion, 7.0);
    }

    #[test]
    fn test_out_of_range_item_rejected() {
        let items = SurveyItems::from_values([5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 10]);
        match compute_section_averages(&items) {
            Err(QualityError::ItemOutOfRange { item, value, .. }) => {
                assert_eq!(item, "e2");
                assert_eq!(value, 10);
            }
            other => panic!("Expected ItemOutOfRange, got {:?}", other),
        }

        let items = SurveyItems::from_values([0, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5]);
        assert!(compute_section_averages(&items).is_err());
    }
}
