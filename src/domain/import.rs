// ==========================================
// 员工管理系统 - 导入结果领域模型
// ==========================================
// RawRow: 文件解析产物（仅在导入流程内）
// RowOutcome / ImportReport: 单次导入的最终产物，返回后不可变
// ==========================================

use serde::{Deserialize, Serialize};

/// 期望的列数（Name, Email, Salary, DepartmentName, JoiningDate）
pub const EXPECTED_COLUMNS: usize = 5;

/// 单个 RowOutcome 内多个错误的连接符
pub const ERROR_SEPARATOR: &str = "; ";

// ==========================================
// RawRow - 原始行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 源文件行号（1 起，表头为第 1 行）
    pub row_number: usize,
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new(row_number: usize, fields: Vec<String>) -> Self {
        Self { row_number, fields }
    }

    /// 按位置取列；缺失的尾部列视为空字符串
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    /// 所有列都为空白
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }
}

// ==========================================
// RowOutcome - 单行结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOutcome {
    pub row_number: usize,
    /// 原样读取的姓名，仅用于展示
    pub employee_name: String,
    pub is_success: bool,
    /// 成功时为空
    pub error_message: String,
}

impl RowOutcome {
    pub fn success(row_number: usize, employee_name: impl Into<String>) -> Self {
        Self {
            row_number,
            employee_name: employee_name.into(),
            is_success: true,
            error_message: String::new(),
        }
    }

    pub fn failure<I, S>(row_number: usize, employee_name: impl Into<String>, reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let error_message = reasons
            .into_iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(ERROR_SEPARATOR);

        Self {
            row_number,
            employee_name: employee_name.into(),
            is_success: false,
            error_message,
        }
    }
}

// ==========================================
// ImportReport - 导入汇总
// ==========================================
// 计数由行结果推导，保证 success + failed == total == rows.len()
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    total_rows: usize,
    success_count: usize,
    failed_count: usize,
    rows: Vec<RowOutcome>,
}

impl ImportReport {
    pub fn from_outcomes(rows: Vec<RowOutcome>) -> Self {
        let success_count = rows.iter().filter(|r| r.is_success).count();
        Self {
            total_rows: rows.len(),
            success_count,
            failed_count: rows.len() - success_count,
            rows,
        }
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    pub fn rows(&self) -> &[RowOutcome] {
        &self.rows
    }
}
