// ==========================================
// 员工管理系统 - 导入模块错误类型
// ==========================================
// 范围: 仅限“整次导入失败”（文件不可读 / 存储不可用 / 最终提交失败）
// 行级校验失败见 row_validator::RowError，不经过此类型
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0} (only .csv and .xlsx are accepted)")]
    UnsupportedFormat(String),

    #[error("File could not be read: {0}")]
    FileReadError(String),

    #[error("Spreadsheet could not be parsed: {0}")]
    ExcelParseError(String),

    #[error("CSV could not be parsed: {0}")]
    CsvParseError(String),

    // ===== 存储相关错误 =====
    #[error("Data store unavailable: {0}")]
    StoreUnavailable(String),

    /// 最终批量提交失败：内存中的成功行均未落库，不返回报告
    #[error(
        "Import could not be saved: {attempted} employee row(s) were not persisted \
         ({departments_created} department(s) created during the run remain): {message}"
    )]
    CommitFailed {
        attempted: usize,
        departments_created: usize,
        message: String,
    },

    // ===== 配置错误 =====
    #[error("Import configuration could not be read: {0}")]
    ConfigError(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

// 读取阶段的仓储错误视为存储不可用
impl From<RepositoryError> for ImportError {
    fn from(err: RepositoryError) -> Self {
        ImportError::StoreUnavailable(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
