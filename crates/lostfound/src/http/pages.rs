//! HTML rendering for every page the server returns.
//!
//! Pages are assembled with `format!`; every piece of user-supplied text goes
//! through [`escape`] first.

use axum::http::StatusCode;

use crate::record::PersonRecord;

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title} - Lost &amp; Found</title></head><body>\
<nav><a href=\"/\">Home</a> | <a href=\"/lost\">Report a missing person</a> | \
<a href=\"/found\">Browse reports</a></nav>\
<main>{body}</main></body></html>"
    )
}

/// Landing page.
#[must_use]
pub fn index() -> String {
    layout(
        "Home",
        "<h1>Lost &amp; Found</h1>\
<p>Help reunite missing people with their families.</p>\
<ul>\
<li><a href=\"/lost\">Report a missing person</a></li>\
<li><a href=\"/found\">Browse submitted reports</a></li>\
</ul>",
    )
}

/// Submission form for a new report.
#[must_use]
pub fn lost_form() -> String {
    layout(
        "Report a missing person",
        "<h1>Report a missing person</h1>\
<form action=\"/lost\" method=\"post\" enctype=\"multipart/form-data\">\
<p><label>Name <input type=\"text\" name=\"name\" required></label></p>\
<p><label>Age <input type=\"text\" name=\"age\" required></label></p>\
<p><label>Last seen at <input type=\"text\" name=\"location\" required></label></p>\
<p><label>Details <textarea name=\"details\" rows=\"4\"></textarea></label></p>\
<p><label>Photo <input type=\"file\" name=\"photo\" accept=\"image/*\" required></label></p>\
<p><button type=\"submit\">Submit report</button></p>\
</form>",
    )
}

/// Listing of every report, in store order.
#[must_use]
pub fn found(records: &[PersonRecord]) -> String {
    let mut list = String::new();
    for record in records {
        list.push_str(&format!(
            "<li><a href=\"/detail/{id}\"><img src=\"{photo}\" alt=\"{name}\" width=\"96\"> \
<strong>{name}</strong></a>, {age}, last seen at {location}</li>",
            id = record.id,
            photo = escape(&record.photo),
            name = escape(&record.name),
            age = escape(&record.age),
            location = escape(&record.location),
        ));
    }
    if list.is_empty() {
        list.push_str("<li>No reports submitted yet.</li>");
    }
    layout(
        "Reports",
        &format!("<h1>Submitted reports</h1><ul class=\"reports\">{list}</ul>"),
    )
}

/// Detail view for one report, or the missing-record state for `None`.
#[must_use]
pub fn detail(record: Option<&PersonRecord>) -> String {
    let Some(record) = record else {
        return layout(
            "Report not found",
            "<h1>Report not found</h1>\
<p>No report matches this id.</p>\
<p><a href=\"/found\">Back to all reports</a></p>",
        );
    };

    let name = escape(&record.name);
    layout(
        &name,
        &format!(
            "<h1>{name}</h1>\
<img src=\"{photo}\" alt=\"{name}\" width=\"320\">\
<dl>\
<dt>Age</dt><dd>{age}</dd>\
<dt>Last seen at</dt><dd>{location}</dd>\
<dt>Details</dt><dd>{details}</dd>\
</dl>\
<p><a href=\"/found\">Back to all reports</a></p>",
            photo = escape(&record.photo),
            age = escape(&record.age),
            location = escape(&record.location),
            details = escape(&record.details),
        ),
    )
}

/// Error page for a failed request.
#[must_use]
pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    layout(
        reason,
        &format!(
            "<h1>{code} {reason}</h1><p>{message}</p>",
            code = status.as_u16(),
            message = escape(message),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> PersonRecord {
        PersonRecord {
            id: 0,
            name: "Jane Doe".to_string(),
            age: "34".to_string(),
            location: "Central Park".to_string(),
            details: "last seen jogging".to_string(),
            photo: "/static/uploads/photo_1.jpg".to_string(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_lost_form_fields() {
        let html = lost_form();
        for field in ["name", "age", "location", "details", "photo"] {
            assert!(html.contains(&format!("name=\"{field}\"")), "{field}");
        }
        assert!(html.contains("multipart/form-data"));
    }

    #[test]
    fn test_found_lists_records() {
        let html = found(&[jane()]);
        assert!(html.contains("href=\"/detail/0\""));
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("/static/uploads/photo_1.jpg"));
    }

    #[test]
    fn test_found_empty() {
        assert!(found(&[]).contains("No reports submitted yet."));
    }

    #[test]
    fn test_detail_present() {
        let html = detail(Some(&jane()));
        assert!(html.contains("<h1>Jane Doe</h1>"));
        assert!(html.contains("Central Park"));
        assert!(html.contains("last seen jogging"));
    }

    #[test]
    fn test_detail_missing() {
        let html = detail(None);
        assert!(html.contains("Report not found"));
    }

    #[test]
    fn test_detail_escapes_user_text() {
        let mut record = jane();
        record.details = "<script>alert(1)</script>".to_string();
        let html = detail(Some(&record));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_error_page() {
        let html = error_page(StatusCode::BAD_REQUEST, "missing form field 'photo'");
        assert!(html.contains("400 Bad Request"));
        assert!(html.contains("missing form field &#39;photo&#39;"));
    }
}
