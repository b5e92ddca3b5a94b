// ==========================================
// 员工管理系统 - 行校验/规范化
// ==========================================
// 列顺序（按位置，不按表头）: Name, Email, Salary, DepartmentName, JoiningDate
// 规则: 各字段独立校验，错误全部收集（不短路）
// ==========================================

use crate::domain::import::RawRow;
use crate::importer::duplicate_detector::DuplicateDetector;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// 列位置
pub mod columns {
    pub const NAME: usize = 0;
    pub const EMAIL: usize = 1;
    pub const SALARY: usize = 2;
    pub const DEPARTMENT_NAME: usize = 3;
    pub const JOINING_DATE: usize = 4;
}

// ==========================================
// RowError - 行级错误
// ==========================================
// 文案即对外契约，报告中按 "; " 连接
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("Name is required")]
    NameRequired,

    #[error("Email is required")]
    EmailRequired,

    #[error("Invalid email format")]
    InvalidEmailFormat,

    #[error("Already exists in database")]
    EmailExistsInDatabase,

    #[error("Duplicate email in file")]
    DuplicateEmailInFile,

    #[error("Salary must be a positive number")]
    InvalidSalary,

    #[error("Department name is required")]
    DepartmentRequired,

    #[error("Invalid joining date format")]
    InvalidJoiningDate,

    /// 部门查找/创建时存储失败，按行记录
    #[error("Department could not be resolved: {0}")]
    DepartmentUnresolved(String),
}

// ==========================================
// ValidatedRow - 校验通过、待关联部门的行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRow {
    pub name: String,
    pub email: String,
    /// 小写 email，重复检测用
    pub email_key: String,
    pub salary: Decimal,
    pub department_name: String,
    pub joining_date: NaiveDate,
}

// ==========================================
// RowValidator
// ==========================================
pub struct RowValidator {
    date_formats: Vec<String>,
}

impl RowValidator {
    pub fn new(date_formats: Vec<String>) -> Self {
        Self { date_formats }
    }

    /// 校验单行
    ///
    /// # 返回
    /// - Ok(ValidatedRow): 无任何错误
    /// - Err(Vec<RowError>): 非空，按列顺序
    pub fn validate(
        &self,
        row: &RawRow,
        duplicates: &DuplicateDetector,
    ) -> Result<ValidatedRow, Vec<RowError>> {
        let name = row.field(columns::NAME).trim();
        let email = row.field(columns::EMAIL).trim();
        let salary_raw = row.field(columns::SALARY).trim();
        let department_name = row.field(columns::DEPARTMENT_NAME).trim();
        let date_raw = row.field(columns::JOINING_DATE).trim();

        let mut errors = Vec::new();

        if name.is_empty() {
            errors.push(RowError::NameRequired);
        }

        let email_key = email.to_lowercase();
        if let Err(e) = self.check_email(email, &email_key, duplicates) {
            errors.push(e);
        }

        let salary = parse_salary(salary_raw);
        if salary.is_none() {
            errors.push(RowError::InvalidSalary);
        }

        if department_name.is_empty() {
            errors.push(RowError::DepartmentRequired);
        }

        let joining_date = self.parse_date(date_raw);
        if joining_date.is_none() {
            errors.push(RowError::InvalidJoiningDate);
        }

        match (salary, joining_date) {
            (Some(salary), Some(joining_date)) if errors.is_empty() => Ok(ValidatedRow {
                name: name.to_string(),
                email: email.to_string(),
                email_key,
                salary,
                department_name: department_name.to_string(),
                joining_date,
            }),
            _ => Err(errors),
        }
    }

    /// email 校验链：必填 → 含 '@' → 库中已存在 → 本文件已出现
    fn check_email(
        &self,
        email: &str,
        email_key: &str,
        duplicates: &DuplicateDetector,
    ) -> Result<(), RowError> {
        if email.is_empty() {
            return Err(RowError::EmailRequired);
        }
        if !email.contains('@') {
            return Err(RowError::InvalidEmailFormat);
        }
        duplicates.check(email_key)
    }

    /// 按配置顺序尝试日期格式，含时间的格式只取日期部分
    pub fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        if value.is_empty() {
            return None;
        }

        self.date_formats.iter().find_map(|fmt| {
            NaiveDate::parse_from_str(value, fmt)
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(value, fmt)
                        .ok()
                        .map(|dt| dt.date())
                })
        })
    }
}

/// 解析薪资：十进制数（支持科学计数法）且严格大于 0
pub fn parse_salary(value: &str) -> Option<Decimal> {
    // 不接受数字分隔符 '_'
    if value.contains('_') {
        return None;
    }
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
        .filter(|salary| *salary > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::import_config_trait::default_date_formats;

    fn validator() -> RowValidator {
        RowValidator::new(default_date_formats())
    }

    fn row(fields: &[&str]) -> RawRow {
        RawRow::new(2, fields.iter().map(|f| f.to_string()).collect())
    }

    #[test]
    fn test_valid_row_is_normalized() {
        let detector = DuplicateDetector::default();
        let validated = validator()
            .validate(
                &row(&["  Alice ", " Alice@X.com ", "50000.50", " Eng ", "2024-01-01"]),
                &detector,
            )
            .unwrap();

        assert_eq!(validated.name, "Alice");
        assert_eq!(validated.email, "Alice@X.com");
        assert_eq!(validated.email_key, "alice@x.com");
        assert_eq!(validated.salary, Decimal::from_str("50000.50").unwrap());
        assert_eq!(validated.department_name, "Eng");
        assert_eq!(validated.joining_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_invalid_email_format() {
        let detector = DuplicateDetector::default();
        let errors = validator()
            .validate(
                &row(&["Bob", "not-an-email", "60000", "Eng", "2024-02-01"]),
                &detector,
            )
            .unwrap_err();

        assert_eq!(errors, vec![RowError::InvalidEmailFormat]);
        assert_eq!(errors[0].to_string(), "Invalid email format");
    }

    #[test]
    fn test_errors_accumulate() {
        let detector = DuplicateDetector::default();
        let errors = validator()
            .validate(&row(&["Carol", "c@x.com", "abc", "Eng", "31/31/2024"]), &detector)
            .unwrap_err();

        assert_eq!(
            errors,
            vec![RowError::InvalidSalary, RowError::InvalidJoiningDate]
        );
    }

    #[test]
    fn test_empty_row_reports_every_field() {
        let detector = DuplicateDetector::default();
        let errors = validator().validate(&row(&[]), &detector).unwrap_err();

        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Name is required",
                "Email is required",
                "Salary must be a positive number",
                "Department name is required",
                "Invalid joining date format",
            ]
        );
    }

    #[test]
    fn test_salary_must_be_positive() {
        assert!(parse_salary("0").is_none());
        assert!(parse_salary("-10").is_none());
        assert!(parse_salary("").is_none());
        assert!(parse_salary("abc").is_none());
        assert!(parse_salary("1_000").is_none());
        assert!(parse_salary("1_0e3").is_none());
        assert_eq!(parse_salary("0.01"), Some(Decimal::from_str("0.01").unwrap()));
        assert_eq!(parse_salary("5e4"), Some(Decimal::from(50000)));
    }

    #[test]
    fn test_date_formats() {
        let v = validator();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(v.parse_date("2024-03-15"), Some(expected));
        assert_eq!(v.parse_date("2024/03/15"), Some(expected));
        assert_eq!(v.parse_date("20240315"), Some(expected));
        assert_eq!(v.parse_date("03/15/2024"), Some(expected));
        assert_eq!(v.parse_date("2024-03-15 09:30:00"), Some(expected));
        assert_eq!(v.parse_date("31/31/2024"), None);
        assert_eq!(v.parse_date("2024-02-30"), None);
        assert_eq!(v.parse_date(""), None);
    }

    #[test]
    fn test_duplicate_checks_use_detector() {
        let mut detector = DuplicateDetector::new(vec!["taken@x.com".to_string()]);
        detector.accept("seen@x.com");

        let errors = validator()
            .validate(&row(&["A", "TAKEN@x.com", "1", "Eng", "2024-01-01"]), &detector)
            .unwrap_err();
        assert_eq!(errors, vec![RowError::EmailExistsInDatabase]);

        let errors = validator()
            .validate(&row(&["B", "Seen@X.com", "1", "Eng", "2024-01-01"]), &detector)
            .unwrap_err();
        assert_eq!(errors, vec![RowError::DuplicateEmailInFile]);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let detector = DuplicateDetector::default();
        let result = validator().validate(
            &row(&["A", "a@x.com", "1", "Eng", "2024-01-01", "extra", "more"]),
            &detector,
        );
        assert!(result.is_ok());
    }
}
