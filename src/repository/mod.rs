// ==========================================
// 员工管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

pub mod employee_import_repo;
pub mod employee_import_repo_impl;
pub mod error;

// 重导出核心仓储
pub use employee_import_repo::EmployeeImportRepository;
pub use employee_import_repo_impl::EmployeeImportRepositoryImpl;
pub use error::{RepositoryError, RepositoryResult};
