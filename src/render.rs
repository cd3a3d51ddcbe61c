//! Static HTML reports for query results.
//!
//! The interactive page loads [renderjson](https://github.com/caldwell/renderjson)
//! to display the result as a collapsible tree. The highlight page is the older
//! variant that shows the pretty-printed JSON colorized by highlight.js.

use std::path::Path;

use tracing::debug;

use crate::error::ConsoleError;

pub const RENDERJSON_SCRIPT: &str = "http://static.michelepasin.org/thirdparty/renderjson.js";

const INTERACTIVE_HEAD: &str = r#"
<html>
<head>
<meta charset="UTF-8">
<style>
    body {
        background: antiquewhite;
    }
    .title {
        color: grey;
    }
    .query {
        font-size: 19px;
        color: darkgoldenrod;
        font-family: monospace;
    }

    .renderjson {
            font-family: monospace;
            background: black;
            font-size: 14px;
    }

    .renderjson a              { text-decoration: none; }
    .renderjson .disclosure    { color: crimson;
                                font-size: 150%; }
    .renderjson .syntax        { color: grey; }
    .renderjson .string        { color: darkkhaki; }
    .renderjson .number        { color: cyan; }
    .renderjson .boolean       { color: plum; }
    .renderjson .key           { color: lightblue; }
    .renderjson .keyword       { color: lightgoldenrodyellow; }
    .renderjson .object.syntax { color: lightseagreen; }
    .renderjson .array.syntax  { color: lightsalmon; }
</style>
"#;

const INTERACTIVE_TAIL: &str = r#"</p><hr>
    <code id="json_data"></code>

    <script>
    renderjson.set_show_to_level(3);
    renderjson.set_sort_objects(true);
    document.getElementById("json_data").appendChild(renderjson(data));
    </script>
</body>
</html>
"#;

const HIGHLIGHT_HEAD: &str = r#"
<html>
<head>
<meta charset="UTF-8">
<style>
    .query {
        font-size: 20px;
        color: red;
        background: beige;
        font-family: monospace;
    }
</style>
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/9.14.2/styles/default.min.css" />
<script src="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/9.14.2/highlight.min.js"></script>
<script>hljs.initHighlightingOnLoad();</script>
</head>
<body>Query:<p class="query">"#;

/// Page showing the query and an interactive tree of the JSON result.
///
/// `formatted_json` is embedded verbatim as a script literal, so it must be
/// valid JSON. The query text is HTML-escaped.
pub fn html_template_interactive(query: &str, formatted_json: &str) -> String {
    let mut page = String::with_capacity(
        INTERACTIVE_HEAD.len() + INTERACTIVE_TAIL.len() + query.len() + formatted_json.len() + 256,
    );
    page.push_str(INTERACTIVE_HEAD);
    page.push_str(&format!(
        "<script type=\"text/javascript\" src=\"{RENDERJSON_SCRIPT}\"></script>\n"
    ));
    page.push_str("<script>\nvar data = ");
    page.push_str(&escape_script(formatted_json));
    page.push_str(";\n</script>\n</head>\n");
    page.push_str("<body><span class=\"title\">Dimensions DSL query:</span>\n    <p class=\"query\">$ ");
    page.push_str(&escape_html(query));
    page.push_str(INTERACTIVE_TAIL);
    page
}

/// Page showing the query and the JSON result colorized by highlight.js.
pub fn html_template_highlight(query: &str, formatted_json: &str) -> String {
    let mut page = String::from(HIGHLIGHT_HEAD);
    page.push_str(&escape_html(query));
    page.push_str("</p><hr><pre><code>");
    page.push_str(&escape_html(formatted_json));
    page.push_str("</code></pre></body>\n</html>\n");
    page
}

/// Write `contents` to `dir/filename`, creating `dir` if needed.
///
/// Returns the `file://` URL of the written file.
pub fn save_to_file(contents: &str, filename: &str, dir: &Path) -> Result<String, ConsoleError> {
    if !dir.exists() {
        debug!("creating report directory {}", dir.display());
        std::fs::create_dir_all(dir)?;
    }

    let path = std::path::absolute(dir.join(filename))?;
    std::fs::write(&path, contents.as_bytes())?;
    debug!("wrote {} bytes to {}", contents.len(), path.display());

    Ok(format!("file://{}", path.display()))
}

/// File name for a query's report: lowercase words joined by `_`, `.html` suffix.
///
/// ```
/// use dslconsole::render::report_filename;
///
/// assert_eq!(report_filename("search grants return grants"), "search_grants_return_grants.html");
/// assert_eq!(report_filename("   "), "dsl_result.html");
/// ```
pub fn report_filename(query: &str) -> String {
    const MAX_STEM: usize = 60;

    let stem: String = query
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_");

    if stem.is_empty() {
        return "dsl_result.html".to_string();
    }

    let truncated = stem[..stem.len().min(MAX_STEM)].trim_end_matches('_');
    format!("{truncated}.html")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Keep `</script>` and `<!--` inside JSON strings from leaving the data block.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}
