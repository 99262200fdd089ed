//! HTML page for the read view.

use std::fmt::Write;

use crate::persistence::StoredReading;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
table{border-collapse:collapse}\
th,td{border:1px solid #ccc;padding:.3rem .6rem;text-align:right}\
th{background:#eef}";

/// Renders the readings table with the filter form.
///
/// `start` and `end` are echoed verbatim (escaped) into the form whether or
/// not they were valid. Rows are stamped in UTC and the range is compared in
/// UTC, so both the form and the column say so.
#[must_use]
pub fn readings_page(readings: &[StoredReading], start: Option<&str>, end: Option<&str>) -> String {
    let mut html = String::with_capacity(1024 + readings.len() * 128);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Water Quality Readings</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>Water Quality Readings</h1>\n\
         <form method=\"get\" action=\"/\">\n\
         <label>From (UTC) <input type=\"datetime-local\" name=\"start\" value=\"{}\"></label>\n\
         <label>To (UTC) <input type=\"datetime-local\" name=\"end\" value=\"{}\"></label>\n\
         <button type=\"submit\">Filter</button>\n<a href=\"/\">Clear</a>\n</form>\n",
        escape(start.unwrap_or_default()),
        escape(end.unwrap_or_default()),
    );

    if readings.is_empty() {
        html.push_str("<p>No readings.</p>\n");
    } else {
        html.push_str(
            "<table>\n<thead><tr><th>ID</th><th>TDS</th><th>Turbidity</th><th>pH</th>\
             <th>Timestamp (UTC)</th></tr></thead>\n<tbody>\n",
        );
        for r in readings {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                r.id,
                cell(r.tdsvalue),
                cell(r.turbidityvalue),
                cell(r.phvalue),
                r.timestamp.format("%Y-%m-%d %H:%M:%S"),
            );
        }
        html.push_str("</tbody>\n</table>\n");
    }
    let _ = writeln!(html, "<p>{} reading(s)</p>\n</body>\n</html>", readings.len());
    html
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn row(id: i64, ph: Option<f64>) -> StoredReading {
        let Some(timestamp) =
            NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(12, 30, 0))
        else {
            panic!("valid timestamp");
        };
        StoredReading {
            id,
            tdsvalue: Some(120.0),
            turbidityvalue: None,
            phvalue: ph,
            timestamp,
        }
    }

    #[test]
    fn renders_rows_and_blank_cells() {
        let html = readings_page(&[row(7, Some(7.1))], None, None);
        assert!(html.contains("<td>7</td><td>120</td><td></td><td>7.1</td>"));
        assert!(html.contains("2024-01-01 12:30:00"));
        assert!(html.contains("1 reading(s)"));
    }

    #[test]
    fn times_are_labelled_utc() {
        let html = readings_page(&[row(1, None)], None, None);
        assert!(html.contains("From (UTC)"));
        assert!(html.contains("To (UTC)"));
        assert!(html.contains("<th>Timestamp (UTC)</th>"));
    }

    #[test]
    fn empty_listing() {
        let html = readings_page(&[], None, None);
        assert!(html.contains("No readings."));
    }

    #[test]
    fn echoes_escaped_range() {
        let html = readings_page(&[], Some("not-a-date\"><script>"), Some("2024-01-02T00:00"));
        assert!(html.contains("value=\"not-a-date&quot;&gt;&lt;script&gt;\""));
        assert!(html.contains("value=\"2024-01-02T00:00\""));
        assert!(!html.contains("<script>"));
    }
}
