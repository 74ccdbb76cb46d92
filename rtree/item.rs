use super::rectangle::Rectangle;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 叶子节点中存储的数据条目：区域边界 + 标识、名称与人口属性
#[derive(Debug, Display, Clone, PartialEq, Serialize, Deserialize)]
#[display(
    fmt = "Item ID: {}, Name: {}, Pop: {}, Bounds: {}",
    id,
    name,
    population,
    bounds
)]
pub struct StoredItem {
    pub id: i32,
    pub name: String,
    /// 用于阈值过滤的数值属性
    pub population: i64,
    pub bounds: Rectangle,
}

impl StoredItem {
    pub fn new(id: i32, name: impl Into<String>, population: i64, bounds: Rectangle) -> Self {
        StoredItem {
            id,
            name: name.into(),
            population,
            bounds,
        }
    }
}
