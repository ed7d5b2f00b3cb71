//! Static pages and the admin paste listing.

use maud::html;
use minipaste_core::config::Config;
use minipaste_core::models::PasteListing;
use minipaste_core::render::MarkdownRenderer;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const INDEX_HTML: &str = include_str!("../assets/index.html");
const ADMIN_HTML: &str = include_str!("../assets/admin.html");
const STYLE_CSS: &str = include_str!("../assets/style.css");
const TOS_MD: &str = include_str!("../assets/tos.md");
const API_MD: &str = include_str!("../assets/api.md");

/// Everything outside RFC 3986 `unreserved` is escaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn paste_link(config: &Config, name: &str) -> String {
    format!(
        "{}/{}",
        config.base_url,
        utf8_percent_encode(name, PATH_SEGMENT)
    )
}

/// Whether `path` names the admin page.
pub fn is_admin_path(path: &str) -> bool {
    matches!(path, "/admin" | "/admin.html")
}

fn index_page(config: &Config) -> String {
    INDEX_HTML
        .replace("{{CSS}}", STYLE_CSS)
        .replace("{{BASE_URL}}", &config.base_url)
        .replace("{{REPO}}", &config.repo)
        .replace("{{FAVICON}}", config.favicon.as_deref().unwrap_or(""))
}

fn tos_page(config: &Config, markdown: &dyn MarkdownRenderer) -> String {
    let source = TOS_MD
        .replace("{{TOS_MAINTAINER}}", &config.tos_maintainer)
        .replace("{{TOS_MAIL}}", &config.tos_mail)
        .replace("{{BASE_URL}}", &config.base_url);
    markdown.render_markdown(&source)
}

/// Render the static page served at `path`, if there is one.
///
/// Callers pass `/` instead of the real path when the request carries a
/// password, so password-bearing paths resolve to the index page.
pub fn static_page(path: &str, config: &Config, markdown: &dyn MarkdownRenderer) -> Option<String> {
    match path {
        "/" | "/index" | "/index.html" => Some(index_page(config)),
        "/tos" | "/tos.html" => Some(tos_page(config, markdown)),
        "/api" | "/api.html" => Some(markdown.render_markdown(API_MD)),
        _ => None,
    }
}

/// Render the admin page listing every live paste.
pub fn admin_page(pastes: &[PasteListing], config: &Config) -> String {
    let table = html! {
        table.paste_list border="1" {
            tr { th { "Paste Name" } th { "Expiration" } }
            @for paste in pastes {
                tr {
                    td { a href=(paste_link(config, &paste.name)) { (paste.name) } }
                    td {
                        @match paste.expiration {
                            Some(at) => { (at.to_rfc3339()) }
                            None => { "never" }
                        }
                    }
                }
            }
        }
    };
    ADMIN_HTML
        .replace("{{CSS}}", STYLE_CSS)
        .replace("{{PASTE_LIST}}", &table.into_string())
}
