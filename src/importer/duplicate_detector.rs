// ==========================================
// 员工管理系统 - 重复 email 检测
// ==========================================
// 两个键集合:
// - existing: 导入开始时从库中读取一次，导入过程中不再查询
// - accepted: 本次导入已接受的行，接受即写入，下一行立即可见
// 键统一为小写
// ==========================================

use crate::importer::row_validator::RowError;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct DuplicateDetector {
    existing: HashSet<String>,
    accepted: HashSet<String>,
}

impl DuplicateDetector {
    /// 以库中已存在的 email 初始化
    pub fn new<I, S>(existing_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            existing: existing_keys
                .into_iter()
                .map(|k| normalize_key(k.as_ref()))
                .collect(),
            accepted: HashSet::new(),
        }
    }

    /// 检查候选键
    ///
    /// 库中存在优先于本文件重复，两者文案不同便于定位
    pub fn check(&self, key: &str) -> Result<(), RowError> {
        let key = normalize_key(key);
        if self.existing.contains(&key) {
            Err(RowError::EmailExistsInDatabase)
        } else if self.accepted.contains(&key) {
            Err(RowError::DuplicateEmailInFile)
        } else {
            Ok(())
        }
    }

    /// 登记已接受的键；已登记过返回 false
    pub fn accept(&mut self, key: &str) -> bool {
        self.accepted.insert(normalize_key(key))
    }

    pub fn existing_count(&self) -> usize {
        self.existing.len()
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }
}

pub fn normalize_key(email: &str) -> String {
    email.trim().to_lowercase()
}
