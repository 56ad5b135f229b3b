// src/ports/html.rs
use crate::domain::Note;
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::instrument;

/// Renders the board as a standalone HTML page
#[derive(Debug, Default)]
pub struct HtmlPresenter {
    username: Option<String>,
}

impl HtmlPresenter {
    pub fn new() -> Self {
        Self { username: None }
    }

    /// Show who is signed in, in the page header
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    fn render_note(&self, note: &Note) -> String {
        let description = encode_text(&note.description).replace('\n', "<br>");
        let image = match &note.image_url {
            Some(url) => format!(
                r#"
        <img src="{src}" alt="{alt}">"#,
                src = encode_double_quoted_attribute(url),
                alt = encode_double_quoted_attribute(&format!("visual aid for {}", note.name)),
            ),
            None => String::new(),
        };

        format!(
            r#"    <div class="note" data-id="{id}">
        <h3>{name}</h3>
        <p>{description}</p>{image}
        <div class="note-id">{id_text}</div>
        <div class="action">Delete: <code>noteboard delete {id_text}</code></div>
    </div>
"#,
            id = encode_double_quoted_attribute(note.id.as_str()),
            id_text = encode_text(note.id.as_str()),
            name = encode_text(&note.name),
        )
    }

    #[instrument(level = "debug", skip_all, fields(count = notes.len()))]
    pub fn render(&self, notes: &[Note]) -> String {
        let body = if notes.is_empty() {
            r#"    <p class="empty">No notes yet</p>
"#
            .to_string()
        } else {
            notes.iter().map(|n| self.render_note(n)).collect()
        };
        let signed_in = match &self.username {
            Some(name) => format!("Signed in as {}. ", encode_text(name)),
            None => String::new(),
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Notes App</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 2rem auto;
            padding: 0 1rem;
            background-color: #f5f5f5;
        }}
        .note {{
            background: white;
            border-radius: 8px;
            padding: 1rem 2rem;
            margin-bottom: 1rem;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .note img {{
            max-width: 400px;
        }}
        .note-id, .session, .action {{
            font-size: 0.8em;
            color: #666;
        }}
    </style>
</head>
<body>
    <h1>My Notes App</h1>
    <div class="session">{signed_in}Sign out: <code>noteboard logout</code></div>
    <h2>Current Notes</h2>
{body}</body>
</html>"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::note;
    use rstest::rstest;

    #[rstest]
    #[case("<script>alert(1)</script>", "&lt;script&gt;alert(1)&lt;/script&gt;")]
    #[case("Tom & Jerry", "Tom &amp; Jerry")]
    #[case("line1\nline2", "line1<br>line2")]
    fn given_user_text_when_rendering_then_escapes_description(
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        let presenter = HtmlPresenter::new();

        let html = presenter.render(&[note("1", "N", input)]);

        assert!(html.contains(expected), "{html}");
    }

    #[test]
    fn given_notes_when_rendering_then_each_carries_its_delete_command() {
        let html = HtmlPresenter::new().render(&[note("42", "Milk", "2%"), note("a<b", "Tea", "x")]);

        assert!(html.contains("<code>noteboard delete 42</code>"));
        assert!(html.contains("<code>noteboard delete a&lt;b</code>"));
    }

    #[test]
    fn given_any_board_when_rendering_then_header_shows_sign_out_command() {
        let html = HtmlPresenter::new().render(&[]);

        assert!(html.contains("Sign out: <code>noteboard logout</code>"));
    }

    #[test]
    fn given_quote_in_image_url_when_rendering_then_attribute_stays_closed() {
        let mut n = note("1", "Milk", "2%");
        n.image_url = Some(r#"http://x/"onload="evil"#.to_string());

        let html = HtmlPresenter::new().render(&[n]);

        assert!(!html.contains(r#""onload=""#));
        assert!(html.contains("&quot;onload=&quot;evil"));
    }
}
