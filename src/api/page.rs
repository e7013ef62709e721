//! Server-rendered summary form.

use html_escape::{encode_double_quoted_attribute, encode_text};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

use crate::summarizer::Summary;

pub const DEFAULT_URL: &str = "https://www.cnn.com/";
pub const EMPTY_URL_WARNING: &str = "Please enter a valid URL.";

/// What to show beneath the form.
pub enum Outcome<'a> {
    Summary(&'a Summary),
    Warning(&'a str),
    Error(String),
}

pub fn render(url: &str, outcome: Option<&Outcome<'_>>) -> String {
    let result = match outcome {
        None => String::new(),
        Some(Outcome::Summary(summary)) => format!(
            "<section class=\"result\">\n<h2>Website Summary:</h2>\n<p class=\"source\">{}</p>\n<div class=\"summary\">{}</div>\n</section>",
            encode_text(&summary.title),
            render_markdown(&summary.summary),
        ),
        Some(Outcome::Warning(message)) => {
            format!("<div class=\"warning\">{}</div>", encode_text(message))
        }
        Some(Outcome::Error(message)) => {
            format!("<div class=\"error\">{}</div>", encode_text(message))
        }
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Website Summary Generator</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }}
input[type=text] {{ width: 100%; padding: .5rem; box-sizing: border-box; }}
button {{ margin-top: .75rem; padding: .5rem 1rem; }}
.warning {{ background: #fff4ce; padding: .75rem; margin-top: 1rem; }}
.error {{ background: #fde7e9; padding: .75rem; margin-top: 1rem; }}
.summary {{ line-height: 1.5; }}
#spinner {{ display: none; margin-top: 1rem; }}
</style>
</head>
<body>
<h1>Website Summary Generator</h1>
<form method="post" action="/" onsubmit="document.getElementById('spinner').style.display='block'">
<label for="url">Enter Website URL:</label>
<input type="text" id="url" name="url" value="{url}">
<button type="submit">Generate Summary</button>
</form>
<div id="spinner">Generating summary...</div>
{result}
</body>
</html>
"#,
        url = encode_double_quoted_attribute(url),
        result = result,
    )
}

/// Renders the model's Markdown reply. Raw HTML is shown as text and `javascript:` links are
/// neutralized, so the reply cannot inject markup into the page.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) if is_script_url(&dest_url) => {
            Event::Start(Tag::Link { link_type, dest_url: CowStr::Borrowed("#"), title, id })
        }
        other => other,
    });

    let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut rendered, parser);
    rendered
}

fn is_script_url(url: &str) -> bool {
    url.trim_start().to_ascii_lowercase().starts_with("javascript:")
}
