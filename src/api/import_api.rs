// ==========================================
// 员工管理系统 - 员工导入API
// ==========================================
// 职责: 上传入口（后缀校验 → 导入 → 结果视图）
// 输出: 成功返回逐行结果；整次失败返回单条 ApiError
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::import::{ImportReport, RowOutcome};
use crate::importer::{EmployeeImporter, EmployeeImporterImpl, FileFormat};
use crate::repository::EmployeeImportRepositoryImpl;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// 单行结果视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RowResultView {
    /// 源文件行号（表头为第 1 行）
    pub row_number: usize,
    pub employee_name: String,
    pub is_success: bool,
    /// 多个原因以 "; " 连接，成功时为空串
    pub error_message: String,
}

/// 导入结果视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UploadResultView {
    pub total_rows: usize,
    pub success_count: usize,
    pub failed_count: usize,
    pub rows: Vec<RowResultView>,
}

impl From<&RowOutcome> for RowResultView {
    fn from(outcome: &RowOutcome) -> Self {
        Self {
            row_number: outcome.row_number,
            employee_name: outcome.employee_name.clone(),
            is_success: outcome.is_success,
            error_message: outcome.error_message.clone(),
        }
    }
}

impl From<&ImportReport> for UploadResultView {
    fn from(report: &ImportReport) -> Self {
        Self {
            total_rows: report.total_rows(),
            success_count: report.success_count(),
            failed_count: report.failed_count(),
            rows: report.rows().iter().map(RowResultView::from).collect(),
        }
    }
}

/// 导入API
pub struct ImportApi {
    db_path: String,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    /// 导入上传的文件
    ///
    /// # 参数
    /// - file_name: 上传时的文件名（仅用于判别格式）
    /// - bytes: 文件内容
    ///
    /// # 返回
    /// - Ok(UploadResultView): 逐行结果
    /// - Err(ApiError): 后缀不支持 / 文件不可读 / 存储不可用 / 提交失败
    pub async fn import_upload(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<UploadResultView> {
        // 后缀不支持时不触达导入引擎
        let format = FileFormat::from_file_name(file_name).map_err(|e| {
            warn!(file_name = %file_name, "拒绝不支持的文件类型");
            ApiError::from(e)
        })?;

        let importer = self.create_importer()?;
        let report = importer.import_bytes(bytes, format).await?;

        Ok(UploadResultView::from(&report))
    }

    /// 按路径导入本地文件
    pub async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ApiResult<UploadResultView> {
        let importer = self.create_importer()?;
        let report = importer.import_file(file_path).await?;

        Ok(UploadResultView::from(&report))
    }

    fn create_importer(
        &self,
    ) -> ApiResult<EmployeeImporterImpl<EmployeeImportRepositoryImpl, ConfigManager>> {
        let import_repo = EmployeeImportRepositoryImpl::new(&self.db_path)?;
        let config = ConfigManager::new(&self.db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;

        Ok(EmployeeImporterImpl::new(import_repo, config))
    }
}
