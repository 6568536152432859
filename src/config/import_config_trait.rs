// ==========================================
// 制造业 ERP - 导入配置读取 Trait
// ==========================================
// 职责: 定义库存导入所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// CSV 未填写计量单位时的默认单位
    ///
    /// # 默认值
    /// - pcs
    async fn get_default_unit(&self) -> Result<String, Box<dyn Error>>;

    /// CSV 未填写工厂时的默认工厂
    ///
    /// # 默认值
    /// - None
    async fn get_default_plant(&self) -> Result<Option<String>, Box<dyn Error>>;
}
