//! Base layout components for the dashboard.

use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Must be inline so it runs before the body renders.
const THEME_INIT_SCRIPT: &str = r#"(function() {
    var theme = localStorage.getItem('theme');
    if (theme) {
        document.documentElement.setAttribute('data-theme', theme);
    } else if (window.matchMedia('(prefers-color-scheme: dark)').matches) {
        document.documentElement.setAttribute('data-theme', 'dark');
    }
})();"#;

const THEME_TOGGLE_SCRIPT: &str = r#"(function() {
    var toggle = document.getElementById('theme-toggle');
    if (!toggle) return;
    toggle.addEventListener('click', function() {
        var html = document.documentElement;
        var next = html.getAttribute('data-theme') === 'dark' ? 'light' : 'dark';
        html.setAttribute('data-theme', next);
        localStorage.setItem('theme', next);
    });
})();"#;

const DASHBOARD_STYLE: &str = r#"
.sentiment-badge { padding: 0.1em 0.5em; border-radius: 3px; font-size: 0.8em; font-weight: bold; white-space: nowrap; }
.sentiment-bullish { background-color: #d93025; color: white; }
.sentiment-bearish { background-color: #188038; color: white; }
.sentiment-neutral { background-color: #80868b; color: white; }
.category-badge { padding: 0.1em 0.4em; border: 1px solid currentColor; border-radius: 3px; font-size: 0.75em; }
.gauge { height: 0.75rem; border-radius: 0.375rem; background: linear-gradient(90deg, #188038, #f9ab00, #d93025); position: relative; }
.gauge-marker { position: absolute; top: -0.25rem; width: 0.25rem; height: 1.25rem; background: var(--pico-color); }
.stats-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(8rem, 1fr)); gap: 1rem; }
article.error { border-left: 4px solid #d93025; }
article.warning { border-left: 4px solid #f9ab00; }
"#;

/// Base page layout builder.
///
/// ```ignore
/// let page = BaseLayout::new("PTT 情緒").render(html! { h1 { "..." } });
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
}

impl<'a> BaseLayout<'a> {
    #[must_use]
    pub const fn new(title: &'a str) -> Self {
        Self { title }
    }

    /// Render the complete HTML page with `content` inside `<main>`.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="zh-Hant-TW" data-theme="light" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    meta name="color-scheme" content="light dark";
                    title { (self.title) " - 台股情緒儀表板" }
                    link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";
                    link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>📈</text></svg>";
                    style { (PreEscaped(DASHBOARD_STYLE)) }
                    script { (PreEscaped(THEME_INIT_SCRIPT)) }
                }
                body {
                    (Self::render_header())
                    main class="container" {
                        (content)
                    }
                    (Self::render_footer())
                    script { (PreEscaped(THEME_TOGGLE_SCRIPT)) }
                }
            }
        }
    }

    fn render_header() -> Markup {
        html! {
            header class="container" {
                nav {
                    ul {
                        li {
                            a href="/" {
                                strong class="site-logo" { "台股情緒" }
                            }
                        }
                    }
                    ul {
                        li { a href="/" { "總覽" } }
                        li { a href="/ptt" { "PTT 情緒" } }
                        li { a href="/analyze" { "文章分析" } }
                        li {
                            button
                                id="theme-toggle"
                                class="theme-toggle outline"
                                title="Toggle dark mode"
                                aria-label="Toggle dark mode" { "🌓" }
                        }
                    }
                }
            }
        }
    }

    fn render_footer() -> Markup {
        html! {
            footer class="container" {
                small {
                    "資料來源：PTT Stock 板、Podcast RSS、CNN Fear & Greed Index | "
                    a href="/api/ptt-sentiment" { "JSON" }
                    " | 本頁內容僅供參考，不構成投資建議"
                }
            }
        }
    }
}
