// ==========================================
// 酒店服务质量问卷 - 答卷数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 对齐: respuesta_encuesta 表
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::survey::{NewSurveyResponse, SurveyItems, SurveyResponse};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    id, correo_electronico, fecha_respuesta,
    a1, a2, a3, a4, b1, b2, b3, c1, c2, c3, d1, d2, e1, e2
"#;

// ==========================================
// SurveyResponseRepository - 答卷仓储
// ==========================================
/// 答卷仓储
/// 职责: 管理 respuesta_encuesta 表的写入与查询
pub struct SurveyResponseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SurveyResponseRepository {
    /// 创建新的 SurveyResponseRepository 实例 (独立连接,自动建表)
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入答卷
    ///
    /// # 返回
    /// - Ok(i64): 新答卷 id
    pub fn insert(&self, response: &NewSurveyResponse) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let it = &response.items;
        conn.execute(
            r#"
            INSERT INTO respuesta_encuesta (
                correo_electronico, fecha_respuesta,
                a1, a2, a3, a4, b1, b2, b3, c1, c2, c3, d1, d2, e1, e2
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                response.correo_electronico,
                response.fecha_respuesta.to_rfc3339(),
                it.a1,
                it.a2,
                it.a3,
                it.a4,
                it.b1,
                it.b2,
                it.b3,
                it.c1,
                it.c2,
                it.c3,
                it.d1,
                it.d2,
                it.e1,
                it.e2,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按 id 查询
    ///
    /// # 返回
    /// - Ok(Some(SurveyResponse)): 找到答卷
    /// - Ok(None): 未找到
    /// - Err: 数据库错误
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<SurveyResponse>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM respuesta_encuesta WHERE id = ?1", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let result = stmt.query_row(params![id], map_response).optional()?;
        Ok(result)
    }

    /// 查询全部答卷 (按 id 升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<SurveyResponse>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM respuesta_encuesta ORDER BY id ASC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let responses = stmt
            .query_map([], map_response)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(responses)
    }

    /// 答卷总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM respuesta_encuesta", [], |row| row.get(0))?;
        Ok(n)
    }
}

fn map_response(row: &Row<'_>) -> SqliteResult<SurveyResponse> {
    let raw_ts: String = row.get(2)?;
    let fecha_respuesta = DateTime::parse_from_rfc3339(&raw_ts)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

    let mut values = [0i32; 14];
    for (offset, slot) in values.iter_mut().enumerate() {
        *slot = row.get(3 + offset)?;
    }

    Ok(SurveyResponse {
        id: row.get(0)?,
        correo_electronico: row.get(1)?,
        fecha_respuesta,
        items: SurveyItems::from_values(values),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_repo() -> SurveyResponseRepository {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        SurveyResponseRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_insert_and_find() {
        let repo = memory_repo();
        let items = SurveyItems::from_values([9, 8, 8, 8, 8, 8, 7, 8, 8, 8, 6, 7, 7, 7]);
        let id = repo
            .insert(&NewSurveyResponse::new("huesped@example.com", items))
            .unwrap();

        let found = repo.find_by_id(id).unwrap().expect("答卷应存在");
        assert_eq!(found.id, id);
        assert_eq!(found.correo_electronico, "huesped@example.com");
        assert_eq!(found.items, items);

        assert!(repo.find_by_id(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_list_all_ordered() {
        let repo = memory_repo();
        assert_eq!(repo.count().unwrap(), 0);
        for i in 1..=3 {
            repo.insert(&NewSurveyResponse::new(
                format!("h{}@example.com", i),
                SurveyItems::from_values([i; 14]),
            ))
            .unwrap();
        }
        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(repo.count().unwrap(), 3);
        assert_eq!(all[0].correo_electronico, "h1@example.com");
        assert_eq!(all[2].items.a1, 3);
    }
}
