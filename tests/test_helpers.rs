// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use hotel_fuzzy_quality::db::{init_schema, open_sqlite_connection};
use hotel_fuzzy_quality::domain::{SurveyItems, ITEM_CODES};
use rusqlite::Connection;
use std::collections::HashMap;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 场景答卷: 均值为 (8.25, 7.67, 8.0, 6.5, 7.0)
pub fn scenario_items() -> SurveyItems {
    SurveyItems::from_values([9, 8, 8, 8, 8, 8, 7, 8, 8, 8, 6, 7, 7, 7])
}

/// 推理无规则激活的答卷: eficacia=5.67,其余为 9
pub fn no_rule_items() -> SurveyItems {
    SurveyItems::from_values([9, 9, 9, 9, 9, 9, 9, 6, 5, 6, 9, 9, 9, 9])
}

/// 把 14 个得分转换为表单字段
pub fn form_fields(items: &SurveyItems) -> HashMap<String, String> {
    ITEM_CODES
        .iter()
        .zip(items.values())
        .map(|(code, v)| (code.to_string(), v.to_string()))
        .collect()
}
