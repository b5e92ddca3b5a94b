// ==========================================
// 员工管理系统 - 员工/部门领域模型
// ==========================================
// 用途: 导入层写入，仓储层持久化
// 对齐: departments / employees 表
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 部门代码的默认截取长度
pub const DEFAULT_DEPARTMENT_CODE_LENGTH: usize = 3;

// ==========================================
// Department - 已持久化的部门
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub department_id: i64,
    pub department_name: String,
    pub department_code: String,
    pub active: bool,
    pub created_date: DateTime<Utc>,
}

// ==========================================
// NewDepartment - 导入时自动创建的部门
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDepartment {
    pub department_name: String,
    pub department_code: String,
    pub active: bool,
    pub created_date: DateTime<Utc>,
}

impl NewDepartment {
    /// 按名称构造自动创建的部门（active 默认 true）
    pub fn auto_created(name: &str, code_length: usize) -> Self {
        Self {
            department_name: name.to_string(),
            department_code: derive_department_code(name, code_length),
            active: true,
            created_date: Utc::now(),
        }
    }
}

/// 派生部门代码：名称前 N 个字符转大写，不足 N 个字符时取整个名称
///
/// 按字符（而非字节）截取，多字节名称不会被截断在字符中间。
pub fn derive_department_code(name: &str, code_length: usize) -> String {
    name.chars().take(code_length).collect::<String>().to_uppercase()
}

// ==========================================
// NewEmployee - 校验通过的规范化记录
// ==========================================
// 生命周期: 单行处理期间由导入器持有，提交时整批交给仓储
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub salary: Decimal,
    pub department_id: i64,
    pub joining_date: NaiveDate,
}
