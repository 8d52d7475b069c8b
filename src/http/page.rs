//! Static form page served on GET.
//!
//! With configured selectors the form posts JSON `{message, stream}`;
//! without them it posts the message as raw text.

use crate::publish::Selector;

pub const PAGE_TITLE: &str = "NRDT Demo App";

const HEAD: &str = r#"<html>
<head>
<title>NRDT Demo App</title>
</head>
<body>
<form id="post_me" name="post_me" method="POST" action="">
    <label for="message">Message</label>
    <input id="message" name="message" type="text" value="Hello world" />
"#;

const TAIL: &str = r#"    <button type="submit" name="submit">Submit</button>
</form>
<div id="output" style="white-space: pre-wrap; font-family: monospace;">
</div>
"#;

const JSON_SCRIPT: &str = r#"<script>
const formElem = document.getElementById("post_me");
const messageElem = document.getElementById("message");
const streamElem = document.getElementById("stream");
formElem.addEventListener("submit", (ev) => {
    fetch(location.href, {
        "method": "POST",
        headers: { "Content-Type": "application/json" },
        "body": JSON.stringify({ message: messageElem.value, stream: streamElem.value })
    })
    .then(resp => resp.text())
    .then(body => { document.getElementById("output").innerText = body; });
    ev.preventDefault();
});
</script>
"#;

const RAW_SCRIPT: &str = r#"<script>
const formElem = document.getElementById("post_me");
const messageElem = document.getElementById("message");
formElem.addEventListener("submit", (ev) => {
    fetch(location.href, { "method": "POST", "body": messageElem.value })
    .then(resp => resp.text())
    .then(body => { document.getElementById("output").innerText = body; });
    ev.preventDefault();
});
</script>
"#;

/// Render the page once at startup.
pub fn render_page(selectors: &[Selector], structured: bool) -> String {
    let mut page = String::from(HEAD);
    let structured = structured && !selectors.is_empty();

    if structured {
        page.push_str("    <select id=\"stream\" name=\"stream\">\n");
        for s in selectors {
            page.push_str(&format!(
                "        <option value=\"{}\">{}</option>\n",
                escape(&s.name),
                escape(&s.label)
            ));
        }
        page.push_str("    </select>\n");
    }

    page.push_str(TAIL);
    page.push_str(if structured { JSON_SCRIPT } else { RAW_SCRIPT });
    page.push_str("</body>\n</html>\n");
    page
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
