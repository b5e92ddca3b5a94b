// ==========================================
// 员工管理系统 - 员工导入 Repository 实现
// ==========================================
// 职责: 实现导入相关数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::employee::{Department, NewDepartment, NewEmployee};
use crate::repository::employee_import_repo::EmployeeImportRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// EmployeeImportRepositoryImpl
// ==========================================
pub struct EmployeeImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeImportRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 Repository
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在事务中批量插入员工
    fn batch_insert_employees_tx(
        tx: &Transaction,
        employees: &[NewEmployee],
    ) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO employees (name, email, salary, department_id, joining_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )?;

        let mut count = 0;
        for employee in employees {
            stmt.execute(params![
                employee.name,
                employee.email,
                employee.salary.to_string(),
                employee.department_id,
                employee.joining_date.format("%Y-%m-%d").to_string(),
            ])?;
            count += 1;
        }

        Ok(count)
    }

    fn map_department(row: &Row<'_>) -> rusqlite::Result<Department> {
        let created_raw: String = row.get(4)?;
        Ok(Department {
            department_id: row.get(0)?,
            department_name: row.get(1)?,
            department_code: row.get(2)?,
            active: row.get::<_, i64>(3)? != 0,
            created_date: DateTime::parse_from_rfc3339(&created_raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?,
        })
    }

    // ===== 辅助查询（CLI / 测试使用）=====

    /// 统计员工数
    pub fn count_employees(&self) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 统计部门数
    pub fn count_departments(&self) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM departments", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 按名称（忽略大小写）查找部门
    pub fn find_department_by_name(&self, name: &str) -> RepositoryResult<Option<Department>> {
        let conn = self.lock()?;
        let department = conn
            .query_row(
                r#"
                SELECT department_id, department_name, department_code, active_inactive, created_date
                FROM departments
                WHERE department_name = ?1 COLLATE NOCASE
                ORDER BY department_id
                LIMIT 1
                "#,
                params![name],
                Self::map_department,
            )
            .optional()?;
        Ok(department)
    }

    /// 查询某部门下员工的 email 列表
    pub fn list_emails_by_department(&self, department_id: i64) -> RepositoryResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT email FROM employees WHERE department_id = ?1 ORDER BY employee_id")?;
        let emails = stmt
            .query_map(params![department_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(emails)
    }
}

#[async_trait]
impl EmployeeImportRepository for EmployeeImportRepositoryImpl {
    async fn list_employee_emails(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT LOWER(email) FROM employees")?;
        let emails = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(emails)
    }

    async fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT department_id, department_name, department_code, active_inactive, created_date
            FROM departments
            ORDER BY department_id
            "#,
        )?;
        let departments = stmt
            .query_map([], Self::map_department)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(departments)
    }

    /// 单条语句自动提交，返回时新部门已落库
    async fn create_department(&self, department: NewDepartment) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO departments (department_name, department_code, active_inactive, created_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                department.department_name,
                department.department_code,
                department.active as i32,
                department.created_date.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn batch_insert_employees(&self, employees: Vec<NewEmployee>) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let count = Self::batch_insert_employees_tx(&tx, &employees)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }
}
