//! Notion block / rich text 构造函数

use serde_json::{json, Value};

/// 纯文本片段
pub fn text(content: &str) -> Value {
    json!({ "type": "text", "text": { "content": content } })
}

/// 带链接的文本片段
pub fn link_text(content: &str, url: &str) -> Value {
    json!({ "type": "text", "text": { "content": content, "link": { "url": url } } })
}

/// 页面引用片段
pub fn page_mention(page_id: &str) -> Value {
    json!({ "type": "mention", "mention": { "type": "page", "page": { "id": page_id } } })
}

pub fn heading_3(rich_text: Vec<Value>) -> Value {
    json!({
        "object": "block",
        "type": "heading_3",
        "heading_3": { "rich_text": rich_text }
    })
}

/// 表格行，每个单元格是一组 rich text
pub fn table_row(cells: Vec<Vec<Value>>) -> Value {
    json!({
        "object": "block",
        "type": "table_row",
        "table_row": { "cells": cells }
    })
}

/// 带列标题的表格
pub fn table(width: usize, rows: Vec<Value>) -> Value {
    json!({
        "object": "block",
        "type": "table",
        "table": {
            "table_width": width,
            "has_column_header": true,
            "has_row_header": false,
            "children": rows
        }
    })
}

pub fn bulleted_list_item(rich_text: Vec<Value>, children: Vec<Value>) -> Value {
    json!({
        "object": "block",
        "type": "bulleted_list_item",
        "bulleted_list_item": { "rich_text": rich_text, "children": children }
    })
}

pub fn bookmark(url: &str, caption: &str) -> Value {
    json!({
        "type": "bookmark",
        "bookmark": { "url": url, "caption": [text(caption)] }
    })
}

/// 嵌入块（Twitter、Vimeo 等）
pub fn embed(url: &str) -> Value {
    json!({ "type": "embed", "embed": { "url": url } })
}

/// 外部视频块（YouTube 等）
pub fn external_video(url: &str) -> Value {
    json!({
        "type": "video",
        "video": { "type": "external", "external": { "url": url } }
    })
}
