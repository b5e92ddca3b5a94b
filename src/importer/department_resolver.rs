// ==========================================
// 员工管理系统 - 部门解析器
// ==========================================
// 职责: 部门名称 → 部门 ID，不存在则自动创建
// 匹配: 忽略大小写的精确匹配（"Eng" 与 "Engineering" 视为不同部门）
// 缓存: 每次导入新建，预加载库中全部部门；解析/创建过的名称不再查询
// 写入: 新部门立即落库（而非等待最终批量提交），后续行才能关联到其 ID
// ==========================================

use crate::domain::employee::{Department, NewDepartment};
use crate::repository::employee_import_repo::EmployeeImportRepository;
use crate::repository::error::RepositoryResult;
use std::collections::HashMap;
use tracing::info;

/// 解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDepartment {
    pub department_id: i64,
    /// 本次调用新建
    pub created: bool,
}

pub struct DepartmentResolver {
    by_name: HashMap<String, i64>,
    code_length: usize,
    created: Vec<NewDepartment>,
}

impl DepartmentResolver {
    /// 以库中已有部门预加载缓存
    ///
    /// 同名（忽略大小写）部门以先出现者为准
    pub fn new(departments: Vec<Department>, code_length: usize) -> Self {
        let mut by_name = HashMap::with_capacity(departments.len());
        for department in departments {
            by_name
                .entry(cache_key(&department.department_name))
                .or_insert(department.department_id);
        }

        Self {
            by_name,
            code_length,
            created: Vec::new(),
        }
    }

    /// 查找缓存（不触发创建）
    pub fn lookup(&self, name: &str) -> Option<i64> {
        self.by_name.get(&cache_key(name)).copied()
    }

    /// 解析部门名称，不存在则创建
    ///
    /// 创建失败时缓存不变，下一次引用同名部门会重试创建
    pub async fn resolve<R>(&mut self, repo: &R, name: &str) -> RepositoryResult<ResolvedDepartment>
    where
        R: EmployeeImportRepository + ?Sized,
    {
        if let Some(department_id) = self.lookup(name) {
            return Ok(ResolvedDepartment {
                department_id,
                created: false,
            });
        }

        let department = NewDepartment::auto_created(name.trim(), self.code_length);
        let department_id = repo.create_department(department.clone()).await?;

        info!(
            department_id = department_id,
            department_name = %department.department_name,
            department_code = %department.department_code,
            "自动创建部门"
        );

        self.by_name.insert(cache_key(name), department_id);
        self.created.push(department);

        Ok(ResolvedDepartment {
            department_id,
            created: true,
        })
    }

    /// 本次导入新建的部门
    pub fn created(&self) -> &[NewDepartment] {
        &self.created
    }

    pub fn known_count(&self) -> usize {
        self.by_name.len()
    }
}

fn cache_key(name: &str) -> String {
    name.trim().to_lowercase()
}
