// ==========================================
// 制造业 ERP - 基础资料（工厂 / 计量单位）
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::ReferenceKind;

/// 基础资料值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceValue {
    pub kind: ReferenceKind,
    pub name: String,
    pub created_at: NaiveDateTime,
}

/// 名称归一化键（去空白、忽略大小写），用于重名判断
pub fn normalized_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_name_ignores_case_and_padding() {
        assert_eq!(normalized_name("  Plant-A "), normalized_name("plant-a"));
        assert_ne!(normalized_name("KG"), normalized_name("KGS"));
    }
}
