//! Printable resume markup. Every user- or model-supplied string is escaped.

use crate::models::resume::{OptimizationResult, ResumeDraft};

const PRINT_STYLE: &str = "\
body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 40px 20px; line-height: 1.6; }
h2 { font-size: 28px; margin-bottom: 5px; }
h3 { font-size: 16px; border-bottom: 2px solid #2563eb; padding-bottom: 4px; margin: 20px 0 10px; }
.skills-tag { display: inline-block; padding: 4px 12px; margin: 4px; border-radius: 20px; background: #dbeafe; }
@media print { body { padding: 0; } }";

/// Opens the print dialog once the page has settled.
const PRINT_HOOK: &str =
    "<script>window.addEventListener('load', () => setTimeout(() => window.print(), 250));</script>";

/// Renders the resume body: header, summary, experience, skills, and
/// education when the draft has any.
pub fn render_resume(draft: &ResumeDraft, result: &OptimizationResult) -> String {
    let mut html = String::new();

    html.push_str(&format!("<h2>{}</h2>\n", escape_html(&draft.name)));
    let contact: Vec<String> = [&draft.email, &draft.phone]
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| escape_html(s))
        .collect();
    if !contact.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", contact.join(" &bull; ")));
    }

    html.push_str("<h3>Professional Summary</h3>\n");
    html.push_str(&format!("<p>{}</p>\n", escape_html(&result.summary)));

    html.push_str("<h3>Experience</h3>\n<ul>\n");
    for bullet in &result.experience {
        html.push_str(&format!("<li>{}</li>\n", escape_html(bullet)));
    }
    html.push_str("</ul>\n");

    html.push_str("<h3>Skills</h3>\n<div>");
    for skill in &result.skills {
        html.push_str(&format!(
            "<span class=\"skills-tag\">{}</span>",
            escape_html(skill)
        ));
    }
    html.push_str("</div>\n");

    if !draft.education.trim().is_empty() {
        html.push_str("<h3>Education</h3>\n");
        html.push_str(&format!("<p>{}</p>\n", escape_html(&draft.education)));
    }

    html
}

/// Wraps a rendered body in a standalone page titled "<name> - Resume".
pub fn printable_page(name: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{} - Resume</title>\n<style>\n{PRINT_STYLE}\n</style>\n</head>\n<body>\n{body}{PRINT_HOOK}\n</body>\n</html>\n",
        escape_html(name)
    )
}

fn escape_html(text: &str) -> String {
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
