//! Prompt text and response-shape contracts for each classification task.

use serde_json::{json, Value};

use crate::constants::MAX_OPINIONS_PER_LABEL;
use crate::models::Episode;

pub fn light_prompt(title: &str, content: &str) -> String {
    format!(
        r#"你是台灣股市論壇 (PTT Stock 板) 的情緒分析師。請判斷以下文章對所提及個股或大盤的多空情緒。

sentiment 只能是以下三者之一："Bullish"（看多）、"Bearish"（看空）、"Neutral"（中立）。
reason 請用繁體中文、20 字以內簡述理由。

只輸出 JSON，不要輸出 markdown 或其他文字，格式如下：
{{"sentiment": "Bullish", "reason": "簡短理由"}}

標題：{title}
內容：
{content}"#
    )
}

pub fn light_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sentiment": { "type": "STRING", "enum": ["Bullish", "Bearish", "Neutral"] },
            "reason": { "type": "STRING" }
        },
        "required": ["sentiment", "reason"]
    })
}

pub fn deep_prompt(title: &str, content: &str) -> String {
    format!(
        r#"你是台灣股市論壇 (PTT Stock 板) 的情緒分析師。請閱讀以下文章與推文，完成：
1. 判斷整體多空情緒 sentiment，只能是 "Bullish"、"Bearish"、"Neutral" 之一。
2. 用繁體中文、20 字以內寫出 reason。
3. 從內文與推文挑出具代表性的觀點放進 opinions，每則標上 type（"Bullish"、"Bearish"、"Neutral" 之一），每種 type 最多 {max} 則，content 為該觀點的簡短摘錄。

只輸出 JSON，不要輸出 markdown 或其他文字，格式如下：
{{"sentiment": "Neutral", "reason": "簡短理由", "opinions": [{{"type": "Bullish", "content": "觀點"}}]}}

標題：{title}
內容與推文：
{content}"#,
        max = MAX_OPINIONS_PER_LABEL
    )
}

pub fn deep_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sentiment": { "type": "STRING", "enum": ["Bullish", "Bearish", "Neutral"] },
            "reason": { "type": "STRING" },
            "opinions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": { "type": "STRING", "enum": ["Bullish", "Bearish", "Neutral"] },
                        "content": { "type": "STRING" }
                    },
                    "required": ["type", "content"]
                }
            }
        },
        "required": ["sentiment", "reason", "opinions"]
    })
}

const PODCAST_SHAPE: &str = r#"{
  "episodeTitle": "集數標題",
  "summaryPoints": ["重點一", "重點二", "重點三"],
  "companies": [
    {"name": "台積電", "ticker": "2330", "sentiment": "BULLISH", "reason": "簡短理由"}
  ]
}"#;

/// Search-grounded prompt: schema enforcement is unavailable with search, so
/// the shape is spelled out in the text.
pub fn episode_prompt(podcast_name: &str, episode: &Episode) -> String {
    format!(
        r#"請上網搜尋台灣財經 Podcast「{podcast_name}」第 {number} 集（標題：{title}，發布日期 {date}）的內容摘要與討論到的公司。

請整理：
1. summaryPoints：3 到 5 點本集重點，使用繁體中文。
2. companies：本集提到的公司，sentiment 只能是 "BULLISH"、"BEARISH"、"NEUTRAL" 之一，ticker 為台股或美股代號（不確定可省略），reason 20 字以內。

只輸出一個 JSON 物件，不要加上 markdown 標記或任何說明文字，格式必須完全如下：
{shape}"#,
        number = episode.episode_number,
        title = episode.title,
        date = episode.date,
        shape = PODCAST_SHAPE
    )
}

pub fn audio_prompt() -> String {
    r#"以下附件是一集台灣財經 Podcast 的音檔。請聆聽後整理：
1. episodeTitle：本集主題。
2. summaryPoints：3 到 5 點重點，使用繁體中文。
3. companies：提到的公司，sentiment 只能是 "BULLISH"、"BEARISH"、"NEUTRAL" 之一，ticker 可省略，reason 20 字以內。

只輸出 JSON。"#
        .to_string()
}

pub fn podcast_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "episodeTitle": { "type": "STRING" },
            "summaryPoints": { "type": "ARRAY", "items": { "type": "STRING" } },
            "companies": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "ticker": { "type": "STRING" },
                        "sentiment": { "type": "STRING", "enum": ["BULLISH", "BEARISH", "NEUTRAL"] },
                        "reason": { "type": "STRING" }
                    },
                    "required": ["name", "sentiment", "reason"]
                }
            }
        },
        "required": ["episodeTitle", "summaryPoints", "companies"]
    })
}
