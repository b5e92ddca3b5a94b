// ==========================================
// 员工管理系统 - 配置层
// ==========================================
// 职责: 导入配置读取（数据库覆写 + 内置默认值）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{DefaultImportConfig, ImportConfigReader, ImportSettings};
