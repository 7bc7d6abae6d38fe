//! 日志笔记追加
//!
//! 将文本、链接、书签、嵌入与视频组合为一个 bulleted_list_item 追加到页面。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::notion::{blocks, NotionClient};

/// `:shortcode:` 形式的 emoji
static EMOJI_SHORTCODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([a-z0-9_+]+):").expect("valid emoji shortcode regex"));

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));

/// 链接
#[derive(Debug, Clone, Deserialize)]
pub struct LinkInput {
    pub title: String,
    pub url: String,
}

/// 书签
#[derive(Debug, Clone, Deserialize)]
pub struct BookmarkInput {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// PUT /api/notion/latest 请求体，所有字段可选
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteInput {
    pub text: Option<String>,
    pub link: Option<LinkInput>,
    pub bookmark: Option<BookmarkInput>,
    /// 嵌入 URL（Twitter、Vimeo 等，Spotify 不支持）
    pub embed: Option<String>,
    /// 外部视频 URL（YouTube 等）
    pub video: Option<String>,
}

/// 替换已知的 `:shortcode:`，未知的保持原样
pub fn replace_emoji_shortcodes(text: &str) -> String {
    EMOJI_SHORTCODE_REGEX
        .replace_all(text, |caps: &regex::Captures| {
            emojis::get_by_shortcode(&caps[1])
                .map(|emoji| emoji.as_str().to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// 将文本拆分为纯文本与链接交替的 rich text 片段
pub fn linkify(text: &str) -> Vec<Value> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for found in URL_REGEX.find_iter(text) {
        let plain = &text[cursor..found.start()];
        if !plain.is_empty() {
            segments.push(blocks::text(plain));
        }
        segments.push(blocks::link_text(found.as_str(), found.as_str()));
        cursor = found.end();
    }

    let rest = &text[cursor..];
    if !rest.is_empty() {
        segments.push(blocks::text(rest));
    }
    segments
}

/// 构造要追加的 bulleted_list_item
pub fn build_note_block(input: &NoteInput) -> Value {
    let mut rich_text = Vec::new();
    let mut children = Vec::new();

    if let Some(text) = input.text.as_deref().filter(|t| !t.is_empty()) {
        rich_text.extend(linkify(&replace_emoji_shortcodes(text)));
    }
    if let Some(link) = &input.link {
        rich_text.push(blocks::link_text(&link.title, &link.url));
    }
    if let Some(bookmark) = &input.bookmark {
        children.push(blocks::bookmark(
            &bookmark.url,
            bookmark.caption.as_deref().unwrap_or_default(),
        ));
    }
    if let Some(url) = input.embed.as_deref().filter(|u| !u.is_empty()) {
        children.push(blocks::embed(url));
    }
    if let Some(url) = input.video.as_deref().filter(|u| !u.is_empty()) {
        children.push(blocks::external_video(url));
    }

    blocks::bulleted_list_item(rich_text, children)
}

/// 追加笔记到页面
pub async fn append_note(
    notion: &NotionClient,
    page_id: &str,
    input: &NoteInput,
) -> Result<Value, AppError> {
    notion
        .append_block_children(page_id, vec![build_note_block(input)])
        .await
}
