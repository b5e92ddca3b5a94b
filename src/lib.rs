// ==========================================
// 员工管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 功能: 员工/部门批量导入（CSV / Excel）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{ApiError, ImportApi, UploadResultView};
pub use domain::{Department, ImportReport, NewEmployee, RowOutcome};
pub use importer::{EmployeeImporter, EmployeeImporterImpl, FileFormat, ImportError};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "employee-import";
