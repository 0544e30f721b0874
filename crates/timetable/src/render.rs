use shared::domain::TimetableRow;

pub const HEADER_LABELS: [&str; 5] = ["Day", "Period 1", "Period 2", "Period 3", "Period 4"];

/// Builds the timetable table: one header row, then one row per record.
pub fn render_table(rows: &[TimetableRow]) -> String {
    let mut html = String::from("<table><tr>");
    for label in HEADER_LABELS {
        html.push_str("<th>");
        html.push_str(label);
        html.push_str("</th>");
    }
    html.push_str("</tr>");

    for row in rows {
        html.push_str("<tr>");
        for cell in row.cells() {
            html.push_str("<td>");
            push_escaped(&mut html, cell);
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }

    html.push_str("</table>");
    html
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    push_escaped(&mut out, raw);
    out
}

fn push_escaped(out: &mut String, raw: &str) {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::sample_week;

    #[test]
    fn sample_week_renders_header_and_five_rows() {
        let html = render_table(&sample_week());

        assert_eq!(html.matches("<tr>").count(), 6);
        assert_eq!(html.matches("<th>").count(), 5);
        assert_eq!(html.matches("<td>").count(), 25);
        assert!(html.starts_with(
            "<table><tr><th>Day</th><th>Period 1</th><th>Period 2</th><th>Period 3</th><th>Period 4</th></tr>"
        ));
        assert!(html.contains(
            "<tr><td>Monday</td><td>Maths</td><td>Physics</td><td>EVS</td><td>Web Dev</td></tr>"
        ));
        assert!(html.ends_with("</table>"));
    }

    #[test]
    fn empty_rows_still_render_header() {
        let html = render_table(&[]);
        assert_eq!(html.matches("<tr>").count(), 1);
        assert_eq!(html.matches("<td>").count(), 0);
    }

    #[test]
    fn cell_text_is_escaped() {
        let row = TimetableRow::new("Monday", ["<b>Maths</b>", "R&D", "\"EVS\"", "Free"]);
        let html = render_table(&[row]);
        assert!(html.contains("<td>&lt;b&gt;Maths&lt;/b&gt;</td>"));
        assert!(html.contains("<td>R&amp;D</td>"));
        assert!(html.contains("<td>&quot;EVS&quot;</td>"));
    }
}
