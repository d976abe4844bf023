//! Dashboard Page
//! Server-rendered layout: heading, two dropdowns, source link, two charts.
//! Charts are drawn client-side from `/api/figures`.

use crate::dashboard::control_panel::{ControlPanel, DropdownOption};
use std::fmt::Write;

pub const TITLE: &str = "U.S. Chronic Disease Indicators (CDI) Dashboard";

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const SCRIPT: &str = r#"
const yearSelect = document.getElementById("year_dropdown");
const indicatorSelect = document.getElementById("health_indicator_dropdown");

async function updateOutput() {
  const params = new URLSearchParams({
    year: yearSelect.value,
    indicator: indicatorSelect.value,
  });
  const response = await fetch("/api/figures?" + params.toString());
  if (!response.ok) {
    console.error(await response.text());
    return;
  }
  const figures = await response.json();
  Plotly.react("us_map", figures.us_map.data, figures.us_map.layout);
  Plotly.react("indicator_chart", figures.indicator_chart.data, figures.indicator_chart.layout);
}

yearSelect.addEventListener("change", updateOutput);
indicatorSelect.addEventListener("change", updateOutput);
updateOutput();
"#;

/// Render the full page for the given dropdown options.
pub fn render(panel: &ControlPanel) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(TITLE));
    let _ = writeln!(html, "<script src=\"{PLOTLY_JS}\"></script>");
    html.push_str("</head>\n<body>\n<main class=\"container\">\n");

    let _ = writeln!(html, "<h1>{}</h1>", escape_html(TITLE));
    html.push_str("<div class=\"row\">\n");
    render_dropdown(
        &mut html,
        "year_dropdown",
        "Select Year:",
        &panel.years,
        panel.default_value,
    );
    render_dropdown(
        &mut html,
        "health_indicator_dropdown",
        "Select Health Indicator:",
        &panel.indicators,
        panel.default_value,
    );
    html.push_str("</div>\n");

    let _ = writeln!(
        html,
        "<a href=\"{}\" style=\"display: block\">CDC Source Link</a>",
        escape_html(panel.source_link)
    );
    html.push_str("<div id=\"us_map\"></div>\n<div id=\"indicator_chart\"></div>\n");
    html.push_str("</main>\n<script>");
    html.push_str(SCRIPT);
    html.push_str("</script>\n</body>\n</html>\n");
    html
}

fn render_dropdown(
    html: &mut String,
    id: &str,
    label: &str,
    options: &[DropdownOption],
    selected: &str,
) {
    let _ = writeln!(html, "<div class=\"col\">\n<label for=\"{id}\">{label}</label>");
    let _ = writeln!(html, "<select id=\"{id}\" style=\"width: 100%\">");
    for option in options {
        let marker = if option.value == selected { " selected" } else { "" };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{marker}>{}</option>",
            escape_html(&option.value),
            escape_html(&option.label)
        );
    }
    html.push_str("</select>\n</div>\n");
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
