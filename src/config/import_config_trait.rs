// ==========================================
// 员工管理系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// CSV 默认分隔符
pub const DEFAULT_CSV_DELIMITER: u8 = b',';

/// 默认可识别的日期格式（与区域设置无关）
///
/// 含时间部分的格式解析后只保留日期。
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// 部门代码默认长度
pub const DEFAULT_DEPARTMENT_CODE_LENGTH: usize = crate::domain::employee::DEFAULT_DEPARTMENT_CODE_LENGTH;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）、DefaultImportConfig（纯默认值）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取 CSV 分隔符
    ///
    /// # 默认值
    /// - `,`
    ///
    /// # 说明
    /// - 按分隔符直接切分，不支持引号转义
    async fn get_csv_delimiter(&self) -> Result<u8, Box<dyn Error>>;

    /// 获取入职日期可识别格式（chrono 格式串，按顺序尝试）
    ///
    /// # 默认值
    /// - DEFAULT_DATE_FORMATS
    async fn get_date_formats(&self) -> Result<Vec<String>, Box<dyn Error>>;

    /// 获取自动创建部门时代码的截取长度
    ///
    /// # 默认值
    /// - 3
    async fn get_department_code_length(&self) -> Result<usize, Box<dyn Error>>;
}

// ==========================================
// DefaultImportConfig - 纯默认配置
// ==========================================
// 用途: 无数据库配置时（CLI 首次运行 / 单元测试）
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultImportConfig;

#[async_trait]
impl ImportConfigReader for DefaultImportConfig {
    async fn get_csv_delimiter(&self) -> Result<u8, Box<dyn Error>> {
        Ok(DEFAULT_CSV_DELIMITER)
    }

    async fn get_date_formats(&self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(default_date_formats())
    }

    async fn get_department_code_length(&self) -> Result<usize, Box<dyn Error>> {
        Ok(DEFAULT_DEPARTMENT_CODE_LENGTH)
    }
}

pub fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
}

// ==========================================
// ImportSettings - 单次导入使用的配置快照
// ==========================================
// 导入开始时读取一次，导入过程中不再变化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub csv_delimiter: u8,
    pub date_formats: Vec<String>,
    pub department_code_length: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            csv_delimiter: DEFAULT_CSV_DELIMITER,
            date_formats: default_date_formats(),
            department_code_length: DEFAULT_DEPARTMENT_CODE_LENGTH,
        }
    }
}

impl ImportSettings {
    /// 从配置读取器加载
    pub async fn load<C: ImportConfigReader + ?Sized>(config: &C) -> Result<Self, Box<dyn Error>> {
        let csv_delimiter = config.get_csv_delimiter().await?;
        let date_formats = config.get_date_formats().await?;
        let department_code_length = config.get_department_code_length().await?;

        Ok(Self {
            csv_delimiter,
            date_formats,
            department_code_length,
        })
    }
}
