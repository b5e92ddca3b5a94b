// ==========================================
// 员工管理系统 - 导入层
// ==========================================
// 职责: 外部表格文件 → 员工/部门记录
// 支持: CSV, Excel (.xlsx)
// ==========================================

// 模块声明
pub mod department_resolver;
pub mod duplicate_detector;
pub mod employee_importer_impl;
pub mod employee_importer_trait;
pub mod error;
pub mod file_parser;
pub mod row_validator;

// 重导出核心类型
pub use department_resolver::{DepartmentResolver, ResolvedDepartment};
pub use duplicate_detector::DuplicateDetector;
pub use employee_importer_impl::EmployeeImporterImpl;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileFormat, RowSource, UniversalFileParser};
pub use row_validator::{RowError, RowValidator, ValidatedRow};

// 重导出 Trait 接口
pub use employee_importer_trait::EmployeeImporter;
