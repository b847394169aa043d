//! Snapshot HTML Rendering
//!
//! Pure mapping from a snapshot to the HTML page served at `/snap`. The
//! renderer is total: an empty snapshot produces a valid page with a
//! placeholder header and no data rows. All interpolated values are
//! HTML-escaped.

use crate::domain::snapshot::{MarketRecord, Snapshot};

/// Page title.
const PAGE_TITLE: &str = "NSE Snapshot";

/// Header text shown before the first successful fetch.
const EMPTY_CAPTURE_PLACEHOLDER: &str = "no snapshot yet";

/// Table column headers, in render order.
const COLUMNS: [&str; 12] = [
    "Symbol",
    "Series",
    "OpenPrice",
    "HighPrice",
    "LowPrice",
    "Ltp",
    "PreviousPrice",
    "NetPrice",
    "TradedQuantity",
    "TurnoverInLakhs",
    "LastCorpAnnouncementDate",
    "LastCorpAnnouncement",
];

/// Render a snapshot as a complete HTML document.
///
/// Deterministic: the same snapshot always produces the same bytes.
#[must_use]
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut page = String::with_capacity(1024 + snapshot.records.len() * 512);

    page.push_str("<!doctype html>\n<html>\n<head>\n<title>");
    page.push_str(PAGE_TITLE);
    page.push_str("</title>\n</head>\n<body>\n<div align=\"center\">Snapshot Time: ");
    if snapshot.captured_at.is_empty() {
        page.push_str(EMPTY_CAPTURE_PLACEHOLDER);
    } else {
        push_escaped(&mut page, &snapshot.captured_at);
    }
    page.push_str("</div>\n<table width=\"100%\">\n<tr>");
    for column in COLUMNS {
        page.push_str("<th>");
        page.push_str(column);
        page.push_str("</th>");
    }
    page.push_str("</tr>\n");

    for record in &snapshot.records {
        push_row(&mut page, record);
    }

    page.push_str("</table>\n</body>\n</html>\n");
    page
}

fn push_row(page: &mut String, record: &MarketRecord) {
    page.push_str("<tr>");
    for value in [
        &record.symbol,
        &record.series,
        &record.open_price,
        &record.high_price,
        &record.low_price,
        &record.ltp,
        &record.previous_price,
        &record.net_price,
        &record.traded_quantity,
        &record.turnover_in_lakhs,
        &record.last_corp_announcement_date,
        &record.last_corp_announcement,
    ] {
        page.push_str("<td>");
        push_escaped(page, value);
        page.push_str("</td>");
    }
    page.push_str("</tr>\n");
}

/// Append `value` with the HTML special characters escaped.
fn push_escaped(page: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => page.push_str("&amp;"),
            '<' => page.push_str("&lt;"),
            '>' => page.push_str("&gt;"),
            '"' => page.push_str("&quot;"),
            '\'' => page.push_str("&#39;"),
            _ => page.push(ch),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
