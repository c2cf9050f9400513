// ==========================================
// 酒店服务质量问卷 - 命令行入口
// ==========================================
// 子命令: score / submit / sections / results / export / set-admin-password
// 输出: JSON (serde_json) + 本地化提示 (stderr)
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use hotel_fuzzy_quality::app::{get_default_db_path, AppState};
use hotel_fuzzy_quality::domain::{SectionAverages, ITEM_CODES};
use hotel_fuzzy_quality::i18n::{t, t_with_args};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;

#[derive(Parser, Debug)]
#[command(name = "hotel-fuzzy-quality")]
#[command(about = "Encuesta de calidad de servicio hotelero con evaluación difusa")]
#[command(version)]
struct Cli {
    /// SQLite 数据库路径 (默认: HOTEL_FUZZY_QUALITY_DB_PATH 或用户数据目录)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 直接对 5 个分区均值评分
    Score {
        #[arg(long)]
        desempeno: f64,
        #[arg(long)]
        eficiencia: f64,
        #[arg(long)]
        eficacia: f64,
        #[arg(long)]
        estabilidad: f64,
        #[arg(long)]
        prevencion: f64,
    },
    /// 提交一份答卷
    Submit {
        #[arg(long)]
        email: String,
        /// 14 个得分,逗号分隔,顺序 a1..a4,b1..b3,c1..c3,d1,d2,e1,e2
        #[arg(long)]
        items: String,
    },
    /// 打印问卷目录
    Sections,
    /// 列出全部答卷评分 (需管理员口令)
    Results {
        #[arg(long)]
        password: String,
    },
    /// 导出 CSV (需管理员口令)
    Export {
        #[arg(long)]
        password: String,
        #[arg(short, long)]
        output: String,
    },
    /// 设置管理员口令
    SetAdminPassword {
        #[arg(long)]
        password: String,
    },
}

fn form_from_items(raw: &str) -> Result<HashMap<String, String>> {
    let values: Vec<&str> = raw.split(',').map(|v| v.trim()).collect();
    if values.len() != ITEM_CODES.len() {
        bail!(
            "--items 需要 {} 个值, 实际 {}",
            ITEM_CODES.len(),
            values.len()
        );
    }
    Ok(ITEM_CODES
        .iter()
        .zip(values)
        .map(|(code, v)| (code.to_string(), v.to_string()))
        .collect())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    hotel_fuzzy_quality::logging::init();

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::debug!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
    state.apply_configured_locale().await;

    match cli.command {
        Command::Score {
            desempeno,
            eficiencia,
            eficacia,
            estabilidad,
            prevencion,
        } => {
            let averages =
                SectionAverages::new(desempeno, eficiencia, eficacia, estabilidad, prevencion);
            let assessment = state.survey_api.score_averages(&averages)?;
            eprintln!(
                "{}",
                t_with_args(
                    "survey.result_line",
                    &[
                        ("crisp", format!("{:.2}", assessment.crisp).as_str()),
                        ("label", assessment.label.to_string().as_str()),
                    ],
                )
            );
            print_json(&assessment)?;
        }
        Command::Submit { email, items } => {
            let form = form_from_items(&items)?;
            let report = state.survey_api.submit(&email, &form)?;
            eprintln!(
                "{}",
                t_with_args("survey.submitted", &[("id", report.id.to_string().as_str())])
            );
            if let hotel_fuzzy_quality::OutcomeStatus::Fallback { reason } = &report.status {
                eprintln!("{}", t_with_args("survey.fallback_notice", &[("reason", reason.as_str())]));
            }
            print_json(&report)?;
        }
        Command::Sections => {
            print_json(&state.survey_api.list_sections())?;
        }
        Command::Results { password } => {
            let session = state.auth_api.login(&password).await?;
            let rows = state.survey_api.list_results(&session.token);
            state.auth_api.logout(&session.token)?;
            print_json(&rows?)?;
        }
        Command::Export { password, output } => {
            let session = state.auth_api.login(&password).await?;
            let file = File::create(&output).with_context(|| format!("无法创建文件: {}", output))?;
            let count = state
                .survey_api
                .export_results_csv(&session.token, BufWriter::new(file));
            state.auth_api.logout(&session.token)?;
            let count = count?;
            eprintln!(
                "{}",
                t_with_args(
                    "survey.exported",
                    &[("count", count.to_string().as_str()), ("path", output.as_str())],
                )
            );
        }
        Command::SetAdminPassword { password } => {
            state
                .config_manager
                .set_admin_password(&password)
                .map_err(|e| anyhow!(e))?;
            eprintln!("{}", t("auth.password_updated"));
        }
    }

    Ok(())
}
