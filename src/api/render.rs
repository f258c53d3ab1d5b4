//! Server-side HTML fragments
//!
//! Every handler answers with one of these fragments; htmx swaps them into
//! the page. The full page is the embedded `templates/index.html` shell with
//! the UI fragment spliced in.

use crate::services::CategoryGroup;
use crate::storage::Link;

const PAGE_SHELL: &str = include_str!("../../templates/index.html");

/// 转义 HTML 特殊字符（文本与属性值通用）
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Accepts `#rgb`/`#rrggbb`/`#rrggbbaa` and plain colour names.
fn safe_colour(colour: &str) -> Option<&str> {
    let colour = colour.trim();
    let valid = match colour.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => !colour.is_empty() && colour.len() <= 32 && colour.chars().all(|c| c.is_ascii_alphabetic()),
    };
    valid.then_some(colour)
}

/// Only same-site upload paths and http(s) URLs are rendered as `src`/`href`.
fn safe_href(url: &str) -> &str {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("data:") || lower.starts_with("vbscript:") {
        "#"
    } else {
        url
    }
}

/// Full page, locked.
pub fn page(groups: &[CategoryGroup]) -> String {
    PAGE_SHELL
        .replace("%VERSION%", env!("CARGO_PKG_VERSION"))
        .replace("%UI%", &ui(groups, false))
}

/// Toolbar plus link groups. Swapped as a whole on lock/unlock.
pub fn ui(groups: &[CategoryGroup], unlocked: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<div id=\"ui\" class=\"{}\">\n",
        if unlocked { "unlocked" } else { "locked" }
    ));
    out.push_str("<div class=\"toolbar\">\n");
    out.push_str(
        "<input type=\"search\" name=\"search\" placeholder=\"Search links\" autocomplete=\"off\" \
         hx-post=\"/search\" hx-trigger=\"input changed delay:300ms, search\" \
         hx-target=\"#links\" hx-swap=\"outerHTML\">\n",
    );
    if unlocked {
        out.push_str(
            "<button hx-get=\"/add_form\" hx-target=\"#modal\">Add link</button>\n\
             <button class=\"secondary\" hx-post=\"/lock\" hx-target=\"#ui\" hx-swap=\"outerHTML\">Lock</button>\n",
        );
    } else {
        out.push_str(
            "<button class=\"secondary\" hx-post=\"/unlock\" hx-prompt=\"Enter PIN\" \
             hx-target=\"#ui\" hx-swap=\"outerHTML\">Edit</button>\n",
        );
    }
    out.push_str("</div>\n");
    out.push_str(&links(groups, unlocked));
    out.push_str("</div>\n");
    out
}

/// The `#links` container with one section per category group.
pub fn links(groups: &[CategoryGroup], unlocked: bool) -> String {
    let mut out = String::from("<div id=\"links\">\n");

    if groups.is_empty() {
        out.push_str("<p class=\"empty\">No links yet.</p>\n");
    }

    for group in groups {
        out.push_str(&format!(
            "<section class=\"category\">\n<h2>{}</h2>\n<ul>\n",
            escape_html(&group.name)
        ));
        for link in &group.links {
            out.push_str(&link_item(link, unlocked));
        }
        out.push_str("</ul>\n</section>\n");
    }

    out.push_str("</div>\n");
    out
}

fn link_item(link: &Link, unlocked: bool) -> String {
    let style = link
        .colour
        .as_deref()
        .and_then(safe_colour)
        .map(|c| format!(" style=\"--link-colour: {}\"", c))
        .unwrap_or_default();

    let icon = link
        .icon
        .as_deref()
        .map(|src| {
            format!(
                "<img src=\"{}\" alt=\"\" loading=\"lazy\">",
                escape_html(safe_href(src))
            )
        })
        .unwrap_or_default();

    let edit = if unlocked {
        format!(
            "<button class=\"secondary\" hx-get=\"/edit_form?id={}\" hx-target=\"#modal\">Edit</button>",
            link.id
        )
    } else {
        String::new()
    };

    format!(
        "<li class=\"link\"{style}>{icon}<a href=\"{href}\" target=\"_blank\" rel=\"noopener noreferrer\" \
         hx-post=\"/log_click\" hx-vals='{{\"id\": \"{id}\"}}' hx-swap=\"none\" hx-trigger=\"click\">{name}</a>\
         <span class=\"hits\">{hits}</span>{edit}</li>\n",
        style = style,
        icon = icon,
        href = escape_html(safe_href(&link.url)),
        id = link.id,
        name = escape_html(&link.name),
        hits = link.hit_count,
        edit = edit,
    )
}

/// Modal wrapper; clicking the backdrop or the close button empties `#modal`.
pub fn modal(body: &str) -> String {
    format!(
        "<div class=\"modal\" onclick=\"if (event.target === this) this.parentElement.innerHTML = ''\">\n\
         <div class=\"modal-content\">\n{}</div>\n</div>\n",
        body
    )
}

pub fn add_link_form() -> String {
    "<h2>Add link</h2>\n\
     <form hx-post=\"/add\" hx-encoding=\"multipart/form-data\" hx-target=\"#links\" hx-swap=\"outerHTML\" \
     hx-on::after-request=\"if (event.detail.successful) document.getElementById('modal').innerHTML = ''\">\n\
     <label>Name <input name=\"name\" required></label>\n\
     <label>URL <input name=\"url\" type=\"url\" required></label>\n\
     <label>Category <input name=\"category\"></label>\n\
     <label>Colour <input name=\"colour\" placeholder=\"#4f9cf9\"></label>\n\
     <label>Icon <input name=\"icon\" type=\"file\" accept=\"image/*\"></label>\n\
     <div class=\"modal-actions\">\n\
     <button type=\"button\" class=\"secondary\" onclick=\"document.getElementById('modal').innerHTML = ''\">Cancel</button>\n\
     <button type=\"submit\">Save</button>\n\
     </div>\n\
     </form>\n"
        .to_string()
}

/// Read-only view of an existing link; links cannot be modified after creation.
pub fn edit_link_form(link: &Link) -> String {
    let field = |label: &str, value: &str| {
        format!(
            "<label>{} <input value=\"{}\" readonly></label>\n",
            label,
            escape_html(value)
        )
    };

    let mut out = format!("<h2>{}</h2>\n<form>\n", escape_html(&link.name));
    out.push_str(&field("Name", &link.name));
    out.push_str(&field("URL", &link.url));
    out.push_str(&field("Category", link.category.as_deref().unwrap_or("")));
    out.push_str(&field("Colour", link.colour.as_deref().unwrap_or("")));
    if let Some(icon) = &link.icon {
        out.push_str(&field("Icon", icon));
    }
    out.push_str(&field("Clicks", &link.hit_count.to_string()));
    out.push_str(&field("Created", &link.created_at.to_rfc3339()));
    out.push_str(
        "<div class=\"modal-actions\">\n\
         <button type=\"button\" class=\"secondary\" onclick=\"document.getElementById('modal').innerHTML = ''\">Close</button>\n\
         </div>\n</form>\n",
    );
    out
}
