// ==========================================
// 员工管理系统 - 配置管理器
// ==========================================
// 职责: 导入配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::{
    default_date_formats, ImportConfigReader, DEFAULT_CSV_DELIMITER,
    DEFAULT_DEPARTMENT_CODE_LENGTH,
};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;

        Ok(())
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
// 缺失或非法的配置值回退到默认值
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_csv_delimiter(&self) -> Result<u8, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::CSV_DELIMITER, ",")?;

        // 仅接受单个 ASCII 字符；"\t" 作为制表符的写法
        let delimiter = match value.as_str() {
            "\\t" | "\t" => b'\t',
            v if v.len() == 1 && v.is_ascii() => v.as_bytes()[0],
            _ => DEFAULT_CSV_DELIMITER,
        };

        Ok(delimiter)
    }

    async fn get_date_formats(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let value = match self.get_config_value(config_keys::DATE_FORMATS)? {
            Some(v) => v,
            None => return Ok(default_date_formats()),
        };

        let formats: Vec<String> = value
            .split('|')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if formats.is_empty() {
            Ok(default_date_formats())
        } else {
            Ok(formats)
        }
    }

    async fn get_department_code_length(&self) -> Result<usize, Box<dyn Error>> {
        let value = self.get_config_or_default(
            config_keys::DEPARTMENT_CODE_LENGTH,
            &DEFAULT_DEPARTMENT_CODE_LENGTH.to_string(),
        )?;

        Ok(value
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_DEPARTMENT_CODE_LENGTH))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // CSV 解析
    pub const CSV_DELIMITER: &str = "import_csv_delimiter";

    // 入职日期格式（'|' 分隔的 chrono 格式串）
    pub const DATE_FORMATS: &str = "import_date_formats";

    // 自动创建部门
    pub const DEPARTMENT_CODE_LENGTH: &str = "import_department_code_length";
}
