//! Notion API 数据类型

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 数据库查询结果中的单个对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 对象类型，"page" 或 "database"
    pub object: String,
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Page {
    pub fn is_page(&self) -> bool {
        self.object == "page"
    }

    /// 获取属性，并校验其 `type` 字段
    pub fn typed_property(&self, name: &str, kind: &str) -> Option<&Value> {
        self.properties
            .get(name)
            .filter(|p| p.get("type").and_then(Value::as_str) == Some(kind))
    }

    /// `relation` 类型属性中的页面 ID 列表
    pub fn relation_ids(&self, name: &str) -> Option<Vec<String>> {
        let relation = self.typed_property(name, "relation")?.get("relation")?;
        Some(
            relation
                .as_array()?
                .iter()
                .filter_map(|r| r.get("id").and_then(Value::as_str))
                .map(str::to_string)
                .collect(),
        )
    }
}

/// `POST /databases/{id}/query` 响应
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
}
