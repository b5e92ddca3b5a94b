// ==========================================
// 员工管理系统 - 员工导入 Trait
// ==========================================
// 职责: 定义员工导入接口（不包含实现）
// ==========================================

use crate::domain::import::ImportReport;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{FileFormat, RowSource};
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// EmployeeImporter Trait
// ==========================================
// 实现者: EmployeeImporterImpl
#[async_trait]
pub trait EmployeeImporter: Send + Sync {
    /// 处理已打开的行序列
    ///
    /// # 返回
    /// - Ok(ImportReport): 每个数据行对应一条结果（按源文件顺序）
    /// - Err: 整次导入失败（读取中断 / 存储不可用 / 最终提交失败），不返回部分报告
    ///
    /// # 导入流程
    /// 1. 预加载已有 email 与部门
    /// 2. 逐行校验 → 部门解析（缺失则立即创建）→ 重复登记
    /// 3. 校验通过的员工整批提交（单事务）
    /// 4. 生成报告
    async fn import_rows(&self, rows: RowSource) -> ImportResult<ImportReport>;

    /// 从文件路径导入（格式由后缀判别）
    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportReport>;

    /// 从内存字节导入（上传场景，格式已由调用方判别）
    async fn import_bytes(&self, bytes: Vec<u8>, format: FileFormat) -> ImportResult<ImportReport>;
}
