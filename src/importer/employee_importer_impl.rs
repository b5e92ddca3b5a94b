// ==========================================
// 员工管理系统 - 员工导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 校验 → 部门解析 → 重复登记 → 批量落库 → 报告
// 写入: 部门逐个立即落库；员工在全部行处理完后单事务提交
// ==========================================

use crate::config::import_config_trait::{ImportConfigReader, ImportSettings};
use crate::domain::employee::NewEmployee;
use crate::domain::import::{ImportReport, RawRow, RowOutcome};
use crate::importer::department_resolver::DepartmentResolver;
use crate::importer::duplicate_detector::DuplicateDetector;
use crate::importer::employee_importer_trait::EmployeeImporter;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{FileFormat, RowSource, UniversalFileParser};
use crate::importer::row_validator::{columns, RowError, RowValidator};
use crate::repository::employee_import_repo::EmployeeImportRepository;
use async_trait::async_trait;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn, Span};
use uuid::Uuid;

// ==========================================
// EmployeeImporterImpl - 员工导入器实现
// ==========================================
pub struct EmployeeImporterImpl<R, C>
where
    R: EmployeeImportRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    import_repo: R,

    // 配置读取器
    config: C,
}

impl<R, C> EmployeeImporterImpl<R, C>
where
    R: EmployeeImportRepository,
    C: ImportConfigReader,
{
    pub fn new(import_repo: R, config: C) -> Self {
        Self {
            import_repo,
            config,
        }
    }

    pub fn repository(&self) -> &R {
        &self.import_repo
    }

    /// 读取本次导入的配置快照
    async fn load_settings(&self) -> ImportResult<ImportSettings> {
        ImportSettings::load(&self.config)
            .await
            .map_err(|e| ImportError::ConfigError(e.to_string()))
    }

    /// 执行一次导入
    #[instrument(skip(self, settings, rows), fields(run_id))]
    async fn run(&self, settings: ImportSettings, rows: RowSource) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        Span::current().record("run_id", run_id.as_str());
        info!(run_id = %run_id, format = ?rows.format(), "开始导入员工数据");

        // === 步骤 1: 预加载缓存 ===
        debug!("步骤 1: 预加载已有 email 与部门");
        let existing_emails = self.import_repo.list_employee_emails().await.map_err(|e| {
            error!(error = %e, "读取已有员工 email 失败");
            ImportError::from(e)
        })?;
        let departments = self.import_repo.list_departments().await.map_err(|e| {
            error!(error = %e, "读取部门失败");
            ImportError::from(e)
        })?;

        let mut duplicates = DuplicateDetector::new(existing_emails);
        let mut resolver = DepartmentResolver::new(departments, settings.department_code_length);
        let validator = RowValidator::new(settings.date_formats);
        info!(
            existing_emails = duplicates.existing_count(),
            departments = resolver.known_count(),
            "缓存预加载完成"
        );

        // === 步骤 2: 逐行处理 ===
        debug!("步骤 2: 逐行校验");
        let mut outcomes = Vec::new();
        let mut accepted = Vec::new();
        for row in rows {
            let row = row.map_err(|e| {
                error!(error = %e, "文件读取中断");
                e
            })?;

            let outcome = match self
                .process_row(&row, &validator, &mut duplicates, &mut resolver)
                .await
            {
                Ok(employee) => {
                    accepted.push(employee);
                    RowOutcome::success(row.row_number, row.field(columns::NAME))
                }
                Err(errors) => {
                    let outcome =
                        RowOutcome::failure(row.row_number, row.field(columns::NAME), errors);
                    debug!(
                        row_number = row.row_number,
                        reasons = %outcome.error_message,
                        "行校验失败"
                    );
                    outcome
                }
            };
            outcomes.push(outcome);
        }
        info!(
            rows = outcomes.len(),
            accepted = duplicates.accepted_count(),
            departments_created = resolver.created().len(),
            "逐行处理完成"
        );

        // === 步骤 3: 批量提交 ===
        debug!("步骤 3: 批量提交员工");
        let attempted = accepted.len();
        if attempted > 0 {
            let inserted = self
                .import_repo
                .batch_insert_employees(accepted)
                .await
                .map_err(|e| {
                    error!(
                        attempted = attempted,
                        departments_created = resolver.created().len(),
                        error = %e,
                        "员工批量提交失败"
                    );
                    ImportError::CommitFailed {
                        attempted,
                        departments_created: resolver.created().len(),
                        message: e.to_string(),
                    }
                })?;
            info!(count = inserted, "员工批量提交完成");
        }

        // === 步骤 4: 生成报告 ===
        let report = ImportReport::from_outcomes(outcomes);
        info!(
            run_id = %run_id,
            total = report.total_rows(),
            success = report.success_count(),
            failed = report.failed_count(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "员工数据导入完成"
        );

        Ok(report)
    }

    /// 处理单行
    ///
    /// 部门只在其余字段全部通过后才解析，失败行不会留下新部门
    async fn process_row(
        &self,
        row: &RawRow,
        validator: &RowValidator,
        duplicates: &mut DuplicateDetector,
        resolver: &mut DepartmentResolver,
    ) -> Result<NewEmployee, Vec<RowError>> {
        let validated = validator.validate(row, duplicates)?;

        let department = resolver
            .resolve(&self.import_repo, &validated.department_name)
            .await
            .map_err(|e| {
                warn!(
                    row_number = row.row_number,
                    department_name = %validated.department_name,
                    error = %e,
                    "部门解析失败"
                );
                vec![RowError::DepartmentUnresolved(e.to_string())]
            })?;
        if department.created {
            debug!(
                row_number = row.row_number,
                department_id = department.department_id,
                "行引用了新建部门"
            );
        }

        duplicates.accept(&validated.email_key);

        Ok(NewEmployee {
            name: validated.name,
            email: validated.email,
            salary: validated.salary,
            department_id: department.department_id,
            joining_date: validated.joining_date,
        })
    }
}

#[async_trait]
impl<R, C> EmployeeImporter for EmployeeImporterImpl<R, C>
where
    R: EmployeeImportRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    async fn import_rows(&self, rows: RowSource) -> ImportResult<ImportReport> {
        let settings = self.load_settings().await?;
        self.run(settings, rows).await
    }

    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportReport> {
        let settings = self.load_settings().await?;
        info!(file_path = %file_path.as_ref().display(), "打开导入文件");
        let rows = UniversalFileParser::new(settings.csv_delimiter).open_path(file_path)?;
        self.run(settings, rows).await
    }

    async fn import_bytes(&self, bytes: Vec<u8>, format: FileFormat) -> ImportResult<ImportReport> {
        let settings = self.load_settings().await?;
        let rows = UniversalFileParser::new(settings.csv_delimiter).open_bytes(bytes, format)?;
        self.run(settings, rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::import_config_trait::DefaultImportConfig;
    use crate::domain::employee::{Department, NewDepartment};
    use crate::importer::file_parser::CsvParser;
    use crate::repository::error::{RepositoryError, RepositoryResult};
    use std::io::Cursor;
    use std::sync::Mutex;

    /// 内存仓储
    #[derive(Default)]
    struct MemoryRepo {
        emails: Vec<String>,
        departments: Mutex<Vec<NewDepartment>>,
        employees: Mutex<Vec<NewEmployee>>,
        fail_commit: bool,
        fail_create_department: bool,
        fail_list_emails: bool,
        fail_list_departments: bool,
    }

    #[async_trait]
    impl EmployeeImportRepository for MemoryRepo {
        async fn list_employee_emails(&self) -> RepositoryResult<Vec<String>> {
            if self.fail_list_emails {
                return Err(RepositoryError::DatabaseConnectionError("unable to open".to_string()));
            }
            Ok(self.emails.clone())
        }

        async fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
            if self.fail_list_departments {
                return Err(RepositoryError::LockError("poisoned".to_string()));
            }
            Ok(Vec::new())
        }

        async fn create_department(&self, department: NewDepartment) -> RepositoryResult<i64> {
            if self.fail_create_department {
                return Err(RepositoryError::DatabaseQueryError("read-only".to_string()));
            }
            let mut departments = self.departments.lock().unwrap();
            departments.push(department);
            Ok(departments.len() as i64)
        }

        async fn batch_insert_employees(&self, employees: Vec<NewEmployee>) -> RepositoryResult<usize> {
            if self.fail_commit {
                return Err(RepositoryError::DatabaseTransactionError("disk I/O error".to_string()));
            }
            let count = employees.len();
            self.employees.lock().unwrap().extend(employees);
            Ok(count)
        }
    }

    fn csv_rows(content: &str) -> RowSource {
        CsvParser::default().open(Cursor::new(content.as_bytes().to_vec()))
    }

    const HEADER: &str = "Name,Email,Salary,DepartmentName,JoiningDate\n";

    #[tokio::test]
    async fn test_mixed_rows() {
        let importer = EmployeeImporterImpl::new(MemoryRepo::default(), DefaultImportConfig);
        let content = format!(
            "{}Alice,alice@x.com,50000,Eng,2024-01-01\nBob,bob,60000,Eng,2024-02-01\n",
            HEADER
        );

        let report = importer.import_rows(csv_rows(&content)).await.unwrap();

        assert_eq!(report.total_rows(), 2);
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.rows()[0].row_number, 2);
        assert!(report.rows()[0].is_success);
        assert_eq!(report.rows()[1].row_number, 3);
        assert_eq!(report.rows()[1].employee_name, "Bob");
        assert_eq!(report.rows()[1].error_message, "Invalid email format");

        let repo = importer.repository();
        assert_eq!(repo.employees.lock().unwrap().len(), 1);
        let departments = repo.departments.lock().unwrap();
        assert_eq!(departments.len(), 1);
        assert_eq!(departments[0].department_code, "ENG");
    }

    #[tokio::test]
    async fn test_existing_email_rejected() {
        let repo = MemoryRepo {
            emails: vec!["alice@x.com".to_string()],
            ..Default::default()
        };
        let importer = EmployeeImporterImpl::new(repo, DefaultImportConfig);
        let content = format!("{}Alice,ALICE@x.com,50000,Eng,2024-01-01\n", HEADER);

        let report = importer.import_rows(csv_rows(&content)).await.unwrap();

        assert_eq!(report.success_count(), 0);
        assert_eq!(report.rows()[0].error_message, "Already exists in database");
        // 失败行不触发部门创建
        assert!(importer.repository().departments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_failure_fails_run() {
        let repo = MemoryRepo {
            fail_commit: true,
            ..Default::default()
        };
        let importer = EmployeeImporterImpl::new(repo, DefaultImportConfig);
        let content = format!(
            "{}Alice,alice@x.com,50000,Eng,2024-01-01\nCarol,carol@x.com,1,Ops,2024-01-01\n",
            HEADER
        );

        let err = importer.import_rows(csv_rows(&content)).await.unwrap_err();

        match err {
            ImportError::CommitFailed {
                attempted,
                departments_created,
                ..
            } => {
                assert_eq!(attempted, 2);
                assert_eq!(departments_created, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    async fn assert_store_unavailable(repo: MemoryRepo) {
        let importer = EmployeeImporterImpl::new(repo, DefaultImportConfig);
        let content = format!("{}Alice,alice@x.com,50000,Eng,2024-01-01\n", HEADER);

        let err = importer.import_rows(csv_rows(&content)).await.unwrap_err();

        assert!(matches!(err, ImportError::StoreUnavailable(_)), "unexpected error: {err}");
        let repo = importer.repository();
        assert!(repo.departments.lock().unwrap().is_empty());
        assert!(repo.employees.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_email_preload_failure_fails_run() {
        assert_store_unavailable(MemoryRepo {
            fail_list_emails: true,
            ..Default::default()
        })
        .await;
    }

    #[tokio::test]
    async fn test_department_preload_failure_fails_run() {
        assert_store_unavailable(MemoryRepo {
            fail_list_departments: true,
            ..Default::default()
        })
        .await;
    }

    #[tokio::test]
    async fn test_department_store_failure_is_row_level() {
        let repo = MemoryRepo {
            fail_create_department: true,
            ..Default::default()
        };
        let importer = EmployeeImporterImpl::new(repo, DefaultImportConfig);
        let content = format!("{}Alice,alice@x.com,50000,Eng,2024-01-01\n", HEADER);

        let report = importer.import_rows(csv_rows(&content)).await.unwrap();

        assert_eq!(report.failed_count(), 1);
        assert!(report.rows()[0]
            .error_message
            .starts_with("Department could not be resolved: "));
        assert!(importer.repository().employees.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_header_only_gives_empty_report() {
        let importer = EmployeeImporterImpl::new(MemoryRepo::default(), DefaultImportConfig);

        let report = importer.import_rows(csv_rows(HEADER)).await.unwrap();

        assert_eq!(report.total_rows(), 0);
        assert!(report.rows().is_empty());
    }

    #[tokio::test]
    async fn test_import_bytes_rejects_corrupt_xlsx() {
        let importer = EmployeeImporterImpl::new(MemoryRepo::default(), DefaultImportConfig);

        let err = importer
            .import_bytes(b"not a zip".to_vec(), FileFormat::Xlsx)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::ExcelParseError(_)));
    }
}
