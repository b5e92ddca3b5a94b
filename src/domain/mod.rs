// ==========================================
// 员工管理系统 - 领域模型层
// ==========================================
// 职责: 定义员工/部门实体与导入结果
// 红线: 不含数据访问逻辑
// ==========================================

pub mod employee;
pub mod import;

// 重导出核心类型
pub use employee::{Department, NewDepartment, NewEmployee};
pub use import::{ImportReport, RawRow, RowOutcome};
