//! Integration tests for the classifier's model contract and fallbacks.

mod common;

use common::{Reply, ScriptedModel};
use tw_market_sentiment::classifier::keyword::{is_keyword_reason, BULLISH_REASON};
use tw_market_sentiment::classifier::{SentimentClassifier, PODCAST_UNAVAILABLE};
use tw_market_sentiment::llm::Llm;
use tw_market_sentiment::models::{Episode, GroundingSource, Sentiment};

fn classifier(model: &ScriptedModel) -> SentimentClassifier {
    SentimentClassifier::new(model.llm(), "股癌 Gooaye")
}

fn episode() -> Episode {
    Episode {
        id: "531".to_string(),
        title: "EP531 | 🐳".to_string(),
        date: "2025-01-02".to_string(),
        episode_number: "531".to_string(),
    }
}

#[tokio::test]
async fn test_classify_without_model_uses_title_keywords() {
    let classifier = SentimentClassifier::new(Llm::Absent, "股癌 Gooaye");
    let result = classifier.classify("[標的] 2330 看多", "全文都在講崩盤 跌 跌 跌").await;

    assert_eq!(result.sentiment, Sentiment::Bullish);
    assert_eq!(result.reason, BULLISH_REASON);
}

#[tokio::test]
async fn test_classify_normalizes_model_labels() {
    let model = ScriptedModel::texts([
        r#"{"sentiment": "bullish", "reason": "營收創新高"}"#,
        r#"Here you go: {"sentiment": "看空", "reason": "庫存過高"} hope it helps"#,
        r#"{"sentiment": "sideways", "reason": "看不出方向"}"#,
    ]);
    let classifier = classifier(&model);

    let first = classifier.classify("t1", "c").await;
    assert_eq!(first.sentiment, Sentiment::Bullish);
    assert_eq!(first.reason, "營收創新高");

    let second = classifier.classify("t2", "c").await;
    assert_eq!(second.sentiment, Sentiment::Bearish);

    let third = classifier.classify("t3", "c").await;
    assert_eq!(third.sentiment, Sentiment::Neutral);
    assert!(!is_keyword_reason(&third.reason));
}

#[tokio::test]
async fn test_classify_falls_back_on_model_failure() {
    let model = ScriptedModel::new([Reply::Fail, Reply::Text(String::new())]);
    let classifier = classifier(&model);

    let errored = classifier.classify("空頭來了 快逃命", "").await;
    assert_eq!(errored.sentiment, Sentiment::Bearish);
    assert!(is_keyword_reason(&errored.reason));

    let empty = classifier.classify("平盤", "").await;
    assert_eq!(empty.sentiment, Sentiment::Neutral);
    assert!(is_keyword_reason(&empty.reason));
}

#[tokio::test]
async fn test_classify_truncates_content() {
    let model = ScriptedModel::texts([r#"{"sentiment": "Neutral", "reason": "x"}"#]);
    let content = format!("{}TAIL_MARKER", "字".repeat(2000));

    classifier(&model).classify("title", &content).await;

    let prompt = &model.requests()[0].prompt;
    assert!(prompt.contains(&"字".repeat(2000)));
    assert!(!prompt.contains("TAIL_MARKER"));
}

#[tokio::test]
async fn test_classify_rejects_replies_missing_fields() {
    let model = ScriptedModel::texts([
        "{}",
        r#"{"sentiment": "Bullish"}"#,
        r#"{"sentiment": "Bearish", "reason": "  "}"#,
    ]);
    let classifier = classifier(&model);

    for _ in 0..3 {
        let result = classifier.classify("看多 噴 漲", "c").await;
        assert_eq!(result.sentiment, Sentiment::Bullish);
        assert_eq!(result.reason, BULLISH_REASON);
    }
}

#[tokio::test]
async fn test_classify_deep_rejects_replies_missing_fields() {
    for reply in [
        "{}",
        r#"{"sentiment": "Bullish"}"#,
        r#"{"sentiment": "Bullish", "reason": "法說會優於預期"}"#,
        r#"{"sentiment": "Bullish", "reason": "", "opinions": []}"#,
    ] {
        let model = ScriptedModel::texts([reply]);
        let analysis = classifier(&model).classify_deep("t", "c").await;
        assert_eq!(analysis.sentiment, Sentiment::Neutral, "reply: {reply}");
        assert_eq!(analysis.reason, "分析失敗", "reply: {reply}");
        assert!(analysis.opinions.is_empty());
    }
}

#[tokio::test]
async fn test_classify_deep_truncates_content() {
    let model = ScriptedModel::texts([
        r#"{"sentiment": "Neutral", "reason": "x", "opinions": []}"#,
    ]);
    let content = format!("{}TAIL_MARKER", "字".repeat(5000));

    classifier(&model).classify_deep("title", &content).await;

    let prompt = &model.requests()[0].prompt;
    assert!(prompt.contains(&"字".repeat(5000)));
    assert!(!prompt.contains("TAIL_MARKER"));
}

#[tokio::test]
async fn test_classify_deep_caps_opinions() {
    let model = ScriptedModel::texts([r#"{
        "sentiment": "Bullish",
        "reason": "法說會優於預期",
        "opinions": [
            {"type": "Bullish", "content": "一"},
            {"type": "Bullish", "content": "二"},
            {"type": "Bullish", "content": "三"},
            {"type": "Bullish", "content": "四"},
            {"type": "Bearish", "content": "五"}
        ]
    }"#]);

    let analysis = classifier(&model).classify_deep("t", "c").await;

    assert_eq!(analysis.sentiment, Sentiment::Bullish);
    assert_eq!(analysis.opinions.len(), 4);
    assert_eq!(analysis.opinions[3].kind, Sentiment::Bearish);

    let request = &model.requests()[0];
    assert!(request.response_schema.is_some());
    assert!(!request.grounded);
}

#[tokio::test]
async fn test_classify_deep_failure_record() {
    for model in [
        ScriptedModel::new([Reply::Fail]),
        ScriptedModel::texts(["{\"sentiment\": "]),
    ] {
        let analysis = classifier(&model).classify_deep("t", "c").await;
        assert_eq!(analysis.sentiment, Sentiment::Neutral);
        assert_eq!(analysis.reason, "分析失敗");
        assert!(analysis.opinions.is_empty());
    }

    let absent = SentimentClassifier::new(Llm::Absent, "x")
        .classify_deep("t", "c")
        .await;
    assert_eq!(absent.reason, "分析失敗");
}

#[tokio::test]
async fn test_analyze_episode_is_grounded() {
    let sources = vec![GroundingSource {
        title: "news".to_string(),
        uri: "https://news.example.com/531".to_string(),
    }];
    let model = ScriptedModel::new([Reply::Grounded(
        r#"```json
{"episodeTitle": "EP531 | 🐳", "summaryPoints": ["一", "二", "三"],
 "companies": [{"name": "台積電", "ticker": "2330", "sentiment": "BULLISH", "reason": "AI"}]}
```"#
            .to_string(),
        sources.clone(),
    )]);

    let report = classifier(&model).analyze_episode(&episode()).await;

    assert_eq!(report.analysis.summary_points.len(), 3);
    assert_eq!(report.analysis.companies[0].sentiment, Sentiment::Bullish);
    assert_eq!(report.sources, sources);

    let request = &model.requests()[0];
    assert!(request.grounded);
    assert!(request.response_schema.is_none());
    assert!(request.prompt.contains("股癌 Gooaye"));
    assert!(request.prompt.contains("531"));
}

#[tokio::test]
async fn test_analyze_episode_failure_is_unavailable() {
    let model = ScriptedModel::new([Reply::Fail]);
    let report = classifier(&model).analyze_episode(&episode()).await;

    assert_eq!(report.analysis.episode_title, "EP531 | 🐳");
    assert_eq!(report.analysis.summary_points, vec![PODCAST_UNAVAILABLE]);
    assert!(report.analysis.companies.is_empty());
    assert!(report.sources.is_empty());
}

#[tokio::test]
async fn test_analyze_audio_sends_attachment() {
    let model = ScriptedModel::texts([
        r#"{"episodeTitle": "上傳", "summaryPoints": ["a"], "companies": []}"#,
    ]);

    let report = classifier(&model)
        .analyze_audio("audio/mpeg", vec![1, 2, 3])
        .await;
    assert_eq!(report.analysis.episode_title, "上傳");

    let request = &model.requests()[0];
    let attachment = request.attachment.as_ref().unwrap();
    assert_eq!(attachment.mime_type, "audio/mpeg");
    assert_eq!(attachment.data, vec![1, 2, 3]);
    assert!(request.response_schema.is_some());
}
