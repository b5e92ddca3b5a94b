// ==========================================
// 员工管理系统 - 员工导入 Repository Trait
// ==========================================
// 职责: 导入引擎所需的最小数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::employee::{Department, NewDepartment, NewEmployee};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// EmployeeImportRepository Trait
// ==========================================
// 实现者: EmployeeImportRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait EmployeeImportRepository: Send + Sync {
    /// 查询所有已存在员工的 email（小写）
    ///
    /// 每次导入开始时读取一次，导入过程中不再重复查询
    async fn list_employee_emails(&self) -> RepositoryResult<Vec<String>>;

    /// 查询所有部门
    async fn list_departments(&self) -> RepositoryResult<Vec<Department>>;

    /// 创建单个部门并立即落库
    ///
    /// # 返回
    /// - Ok(i64): 新部门 ID（返回时已对后续查询可见）
    async fn create_department(&self, department: NewDepartment) -> RepositoryResult<i64>;

    /// 批量插入员工（事务化）
    ///
    /// # 返回
    /// - Ok(usize): 插入的记录数
    /// - Err: 数据库错误（整个事务回滚，无任何员工落库）
    async fn batch_insert_employees(&self, employees: Vec<NewEmployee>) -> RepositoryResult<usize>;
}
