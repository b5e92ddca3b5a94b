// ==========================================
// 员工管理系统 - 命令行入口
// ==========================================
// 用法:
//   employee-import <db_path> <file>
//   employee-import <file>              （使用默认数据库路径）
// 输出: 导入结果 JSON 写到 stdout；整次失败时写阻断消息到 stderr 并返回非零
// ==========================================

use employee_import::api::ImportApi;
use employee_import::db::{get_default_db_path, init_schema, open_sqlite_connection};
use employee_import::logging;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (db_path, file_path) = match args.as_slice() {
        [file] => (get_default_db_path(), file.clone()),
        [db, file] => (db.clone(), file.clone()),
        _ => {
            eprintln!("usage: employee-import [db_path] <file.csv|file.xlsx>");
            return ExitCode::from(2);
        }
    };

    tracing::info!("{} v{}", employee_import::APP_NAME, employee_import::VERSION);
    tracing::info!("使用数据库: {}", db_path);

    match run(db_path, &file_path).await {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(db_path: String, file_path: &str) -> Result<String, String> {
    // 建表（幂等）
    let conn = open_sqlite_connection(&db_path).map_err(|e| e.to_string())?;
    init_schema(&conn).map_err(|e| e.to_string())?;
    drop(conn);

    let api = ImportApi::new(db_path);
    let view = api.import_file(file_path).await.map_err(|e| e.to_string())?;

    serde_json::to_string_pretty(&view).map_err(|e| e.to_string())
}
