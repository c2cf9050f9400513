// ==========================================
// 酒店服务质量问卷 - SQL 计数与慢查询日志
// ==========================================
// 开关: HOTEL_FUZZY_QUALITY_PERF_SQL / HOTEL_FUZZY_QUALITY_SLOW_SQL_MS
// 计数: 按线程累计 (连接在 Mutex 内,语句总在持锁线程上执行)
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 开关环境变量
pub const PERF_SQL_ENV: &str = "HOTEL_FUZZY_QUALITY_PERF_SQL";
/// 慢 SQL 阈值环境变量 (毫秒)
pub const SLOW_SQL_MS_ENV: &str = "HOTEL_FUZZY_QUALITY_SLOW_SQL_MS";

static PERF_SQL_ENABLED: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static SQL_COUNT: Cell<u64> = const { Cell::new(0) };
    static SLOW_SQL_COUNT: Cell<u64> = const { Cell::new(0) };
}

fn env_flag(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn one_line_sql(sql: &str, max_chars: usize) -> String {
    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let head: String = flat.chars().take(max_chars).collect();
    format!("{}…", head)
}

/// 本线程已记录的 SQL 语句数
pub fn sql_count() -> u64 {
    SQL_COUNT.with(|c| c.get())
}

/// 安装 SQLite 语句 profile（SQL 计数 + 慢查询日志）
///
/// Debug 构建默认开启，Release 默认关闭；环境变量优先。
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let enabled = match std::env::var(PERF_SQL_ENV) {
        Ok(v) => env_flag(&v),
        Err(_) => cfg!(debug_assertions),
    };
    PERF_SQL_ENABLED.store(enabled, Ordering::Relaxed);

    if !enabled {
        conn.profile(None);
        return;
    }

    let slow_ms = std::env::var(SLOW_SQL_MS_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
    SLOW_SQL_THRESHOLD_MS.store(slow_ms, Ordering::Relaxed);

    conn.profile(Some(on_statement_profiled));
    tracing::debug!(slow_ms, "SQL profile 已启用");
}

fn on_statement_profiled(sql: &str, duration: Duration) {
    if !PERF_SQL_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold > 0 && ms >= threshold {
        SLOW_SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
        tracing::warn!(
            target: "slow_sql",
            duration_ms = ms,
            sql = %one_line_sql(sql, 300),
            "慢 SQL"
        );
    }
}

/// 操作耗时统计：drop 时输出 elapsed_ms、SQL 语句数与慢 SQL 数
///
/// ```ignore
/// let _perf = hotel_fuzzy_quality::perf::PerfGuard::new("list_results");
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    sql_start: u64,
    slow_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
            sql_start: sql_count(),
            slow_start: SLOW_SQL_COUNT.with(|c| c.get()),
        }
    }

    /// 自创建以来本线程执行的 SQL 语句数
    pub fn statements(&self) -> u64 {
        sql_count().saturating_sub(self.sql_start)
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let slow_sql = SLOW_SQL_COUNT
            .with(|c| c.get())
            .saturating_sub(self.slow_start);
        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            sql_count = self.statements(),
            slow_sql,
            "done"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line_sql() {
        assert_eq!(one_line_sql("SELECT 1", 20), "SELECT 1");
        assert_eq!(one_line_sql("SELECT\n    *  FROM t", 8), "SELECT *…");
    }

    #[test]
    fn test_env_flag() {
        assert!(env_flag(" On "));
        assert!(!env_flag("0"));
    }

    #[test]
    fn test_guard_counts_profiled_statements() {
        PERF_SQL_ENABLED.store(true, Ordering::Relaxed);
        let guard = PerfGuard::new("test");
        on_statement_profiled("SELECT 1", Duration::from_millis(0));
        on_statement_profiled("SELECT 2", Duration::from_millis(0));
        assert_eq!(guard.statements(), 2);
    }
}
