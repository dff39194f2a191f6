//! Full-page shell.

use super::escape;

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.3";
const LATEX_CSS: &str = "https://unpkg.com/latex.css/style.min.css";

/// Wrap `body` in a complete HTML document titled `title`.
pub fn page(title: &str, body: &str) -> String {
    let title = escape(title);
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="{LATEX_CSS}" type="text/css">
<link rel="stylesheet" href="/static/styles.css" type="text/css">
<script src="{HTMX_SRC}"></script>
</head>
<body>
<h1>{title}</h1>
{body}
</body>
</html>
"#
    )
}
