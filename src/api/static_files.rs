use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use mime_guess::from_path;
use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Assets;

/// Placeholder replaced with the client id when rendering a page template.
const CLIENT_ID_PLACEHOLDER: &str = "{{clientId}}";

/// Load an asset from `static_dir` if present there, else from the embedded set.
pub async fn load_asset(path: &str, static_dir: Option<&str>) -> Option<Cow<'static, [u8]>> {
    if let Some(dir) = static_dir {
        if let Some(file_path) = confined_path(dir, path) {
            if let Ok(content) = tokio::fs::read(&file_path).await {
                return Some(Cow::Owned(content));
            }
        }
    }

    Assets::get(path).map(|file| file.data)
}

/// Serve a static asset with a MIME type guessed from its extension.
pub async fn serve_asset(path: &str, static_dir: Option<&str>) -> Response {
    match load_asset(path, static_dir).await {
        Some(content) => {
            let mime = from_path(path).first_or_octet_stream();
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime.as_ref())
                .body(Body::from(content))
                .unwrap_or_else(|_| not_found())
        }
        None => not_found(),
    }
}

/// Render an HTML page template, substituting the escaped client id.
pub async fn render_page(template: &str, client_id: &str, static_dir: Option<&str>) -> Response {
    let Some(content) = load_asset(template, static_dir).await else {
        tracing::error!(template, "page template missing");
        return not_found();
    };

    let html = String::from_utf8_lossy(&content)
        .replace(CLIENT_ID_PLACEHOLDER, &escape_html(client_id));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(html))
        .unwrap_or_else(|_| not_found())
}

pub fn not_found() -> Response {
    let mut response = Response::new(Body::from("Not Found"));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

/// Join `path` onto `dir`, refusing anything that would escape it.
fn confined_path(dir: &str, path: &str) -> Option<PathBuf> {
    let relative = Path::new(path);
    if relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        Some(PathBuf::from(dir).join(relative))
    } else {
        None
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape_html("andrewvos.com"), "andrewvos.com");
    }

    #[test]
    fn test_confined_path_rejects_traversal() {
        assert!(confined_path("/srv", "../etc/passwd").is_none());
        assert!(confined_path("/srv", "/etc/passwd").is_none());
        assert_eq!(
            confined_path("/srv", "scripts/tracker.js"),
            Some(PathBuf::from("/srv/scripts/tracker.js"))
        );
    }

    #[tokio::test]
    async fn test_embedded_tracker_script_present() {
        assert!(load_asset("scripts/tracker.js", None).await.is_some());
        assert!(load_asset("scripts/missing.js", None).await.is_none());
    }
}
