//! Integration tests for forum aggregation against a mocked board.

mod common;

use common::{aggregator, article_page, config_for, listing_page, ScriptedModel};
use tw_market_sentiment::aggregator::{AggregateError, AggregationPolicy};
use tw_market_sentiment::classifier::keyword::is_keyword_reason;
use tw_market_sentiment::llm::Llm;
use tw_market_sentiment::models::{Category, Sentiment};
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_listing(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/bbs/Stock/{page}")))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_articles(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/bbs/Stock/M\..+\.html$"))
        .respond_with(html(article_page(
            "文章",
            "內文",
            &[("推", "好"), ("噓", "不好")],
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_run_walks_three_pages_in_order() {
    let server = MockServer::start().await;
    let config = config_for(&server.uri());

    Mock::given(method("GET"))
        .and(path("/bbs/Stock/index.html"))
        .and(header("cookie", "over18=1"))
        .respond_with(html(listing_page(
            &[
                ("5", "[標的] 2330 台積電 看多", "/bbs/Stock/M.3.1.A.html"),
                ("3", "[閒聊] 今天吃什麼", "/bbs/Stock/M.3.2.A.html"),
                ("", "本文已被刪除", ""),
                ("爆", "[新聞] 大盤崩跌", "/bbs/Stock/M.3.3.A.html"),
            ],
            Some("/bbs/Stock/index3.html"),
        )))
        .expect(1)
        .mount(&server)
        .await;
    mount_listing(
        &server,
        "index3.html",
        listing_page(
            &[("25", "[請益] 0050 還能買嗎", "/bbs/Stock/M.2.1.A.html")],
            Some("/bbs/Stock/index2.html"),
        ),
    )
    .await;
    mount_listing(
        &server,
        "index2.html",
        listing_page(
            &[("1", "[標的] 2454 聯發科 空", "/bbs/Stock/M.1.1.A.html")],
            Some("/bbs/Stock/index1.html"),
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/bbs/Stock/index1.html"))
        .respond_with(html(listing_page(
            &[("爆", "[標的] 1101 台泥 多", "/bbs/Stock/M.0.1.A.html")],
            None,
        )))
        .expect(0)
        .mount(&server)
        .await;
    mount_articles(&server).await;

    let posts = aggregator(&config, Llm::Absent, AggregationPolicy::default())
        .run()
        .await
        .unwrap();

    let links: Vec<_> = posts
        .iter()
        .map(|p| p.link.trim_start_matches(&server.uri()))
        .collect();
    assert_eq!(
        links,
        vec![
            "/bbs/Stock/M.3.1.A.html",
            "/bbs/Stock/M.3.3.A.html",
            "/bbs/Stock/M.2.1.A.html",
            "/bbs/Stock/M.1.1.A.html",
        ]
    );

    let target = &posts[0];
    assert_eq!(target.category, Category::Target);
    assert_eq!(target.stock_id.as_deref(), Some("2330"));
    assert_eq!(target.push_count, "5");
    assert_eq!(target.author, "tester");
    assert_eq!(target.sentiment, Sentiment::Bullish);
    assert!(is_keyword_reason(&target.reason));

    let popular = &posts[1];
    assert_eq!(popular.category, Category::Other);
    assert_eq!(popular.push_count, "爆");
    assert_eq!(popular.stock_id, None);
    assert_eq!(popular.sentiment, Sentiment::Bearish);

    assert_eq!(posts[2].stock_id.as_deref(), Some("0050"));
    assert_eq!(posts[2].category, Category::Other);
    assert_eq!(posts[3].category, Category::Target);
}

#[tokio::test]
async fn test_run_caps_candidates_per_page() {
    let server = MockServer::start().await;
    let config = config_for(&server.uri());

    let links: Vec<String> = (1..=7).map(|i| format!("/bbs/Stock/M.{i}.A.html")).collect();
    let mut rows = vec![("0", "[閒聊] 冷門", "/bbs/Stock/M.0.A.html")];
    rows.extend(links.iter().map(|l| ("30", "[新聞] 熱門", l.as_str())));

    mount_listing(&server, "index.html", listing_page(&rows, None)).await;
    mount_articles(&server).await;

    let policy = AggregationPolicy {
        max_pages: 1,
        ..AggregationPolicy::default()
    };
    let posts = aggregator(&config, Llm::Absent, policy).run().await.unwrap();

    assert_eq!(posts.len(), 5);
    assert!(posts[0].link.ends_with("/bbs/Stock/M.1.A.html"));
    assert!(posts[4].link.ends_with("/bbs/Stock/M.5.A.html"));
}

#[tokio::test]
async fn test_run_fails_when_first_page_unavailable() {
    let server = MockServer::start().await;
    let config = config_for(&server.uri());

    Mock::given(method("GET"))
        .and(path("/bbs/Stock/index.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = aggregator(&config, Llm::Absent, AggregationPolicy::default())
        .run()
        .await;

    assert_eq!(
        result,
        Err(AggregateError::ListingUnavailable(config.board_index_url()))
    );
}

#[tokio::test]
async fn test_run_stops_at_unavailable_later_page() {
    let server = MockServer::start().await;
    let config = config_for(&server.uri());

    mount_listing(
        &server,
        "index.html",
        listing_page(
            &[("50", "[新聞] 外資買超", "/bbs/Stock/M.1.A.html")],
            Some("/bbs/Stock/index9.html"),
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/bbs/Stock/index9.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_articles(&server).await;

    let posts = aggregator(&config, Llm::Absent, AggregationPolicy::default())
        .run()
        .await
        .unwrap();

    assert_eq!(posts.len(), 1);
}

#[tokio::test]
async fn test_unreachable_detail_page_still_yields_post() {
    let server = MockServer::start().await;
    let config = config_for(&server.uri());

    mount_listing(
        &server,
        "index.html",
        listing_page(&[("爆", "[標的] 3008 大立光 做多", "/bbs/Stock/M.1.A.html")], None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/bbs/Stock/M.1.A.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let posts = aggregator(&config, Llm::Absent, AggregationPolicy::default())
        .run()
        .await
        .unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].stock_id.as_deref(), Some("3008"));
    assert_eq!(posts[0].sentiment, Sentiment::Bullish);
}

#[tokio::test]
async fn test_run_uses_model_and_falls_back_per_post() {
    let server = MockServer::start().await;
    let config = config_for(&server.uri());

    mount_listing(
        &server,
        "index.html",
        listing_page(
            &[
                ("40", "[新聞] 央行升息", "/bbs/Stock/M.1.A.html"),
                ("40", "[標的] 2603 長榮 空 跌", "/bbs/Stock/M.2.A.html"),
            ],
            None,
        ),
    )
    .await;
    mount_articles(&server).await;

    let model = ScriptedModel::texts([
        "```json\n{\"sentiment\": \"BEARISH\", \"reason\": \"升息壓抑股市\"}\n```",
        "not json at all",
    ]);
    let posts = aggregator(&config, model.llm(), AggregationPolicy::default())
        .run()
        .await
        .unwrap();

    assert_eq!(posts[0].sentiment, Sentiment::Bearish);
    assert_eq!(posts[0].reason, "升息壓抑股市");

    assert_eq!(posts[1].sentiment, Sentiment::Bearish);
    assert!(is_keyword_reason(&posts[1].reason));

    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].prompt.contains("央行升息"));
    assert!(requests[0].prompt.contains("內文"));
    assert!(requests[0].prompt.contains("推 好"));
    assert!(requests[0].response_schema.is_some());
    assert!(!requests[0].grounded);
}
