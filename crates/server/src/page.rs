//! Server-side page model for the timetable viewer.

use shared::{domain::BatchId, protocol::DepartmentBatches};
use timetable::{render::escape_html, DisplayRegion, Notifier};

/// Blocking notification shown above the form.
#[derive(Debug, Default)]
pub(crate) struct AlertBanner(Option<String>);

impl AlertBanner {
    pub(crate) fn message(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl Notifier for AlertBanner {
    fn notify(&mut self, message: &str) {
        self.0 = Some(message.to_string());
    }
}

/// The `timetable-section` container.
#[derive(Debug, Default)]
pub(crate) struct TimetableSection {
    markup: String,
}

impl TimetableSection {
    pub(crate) fn markup(&self) -> &str {
        &self.markup
    }
}

impl DisplayRegion for TimetableSection {
    fn replace_contents(&mut self, markup: String) {
        self.markup = markup;
    }
}

/// The viewer page: batch dropdown, view button and the timetable section.
pub(crate) struct ViewerPage<'a> {
    departments: &'a [DepartmentBatches],
    selected: BatchId,
    pub(crate) alert: AlertBanner,
    pub(crate) section: TimetableSection,
}

impl<'a> ViewerPage<'a> {
    pub(crate) fn new(departments: &'a [DepartmentBatches], selected: BatchId) -> Self {
        Self {
            departments,
            selected,
            alert: AlertBanner::default(),
            section: TimetableSection::default(),
        }
    }

    pub(crate) fn selected(&self) -> &BatchId {
        &self.selected
    }

    pub(crate) fn to_html(&self) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Class Timetable</title>\n</head>\n<body>\n<h1>Class Timetable</h1>\n",
        );

        if let Some(message) = self.alert.message() {
            html.push_str("<div class=\"alert\" role=\"alert\">");
            html.push_str(&escape_html(message));
            html.push_str("</div>\n");
        }

        html.push_str("<form method=\"get\" action=\"/\">\n<label for=\"batch\">Batch</label>\n");
        html.push_str(
            "<select id=\"batch\" name=\"batch_id\">\n<option value=\"\">-- Select batch --</option>\n",
        );
        for group in self.departments {
            html.push_str("<optgroup label=\"");
            html.push_str(&escape_html(&group.department));
            html.push_str("\">\n");
            for batch in &group.batches {
                let selected = if batch.batch_id == self.selected {
                    " selected"
                } else {
                    ""
                };
                html.push_str(&format!(
                    "<option value=\"{}\"{selected}>{}</option>\n",
                    escape_html(batch.batch_id.as_str()),
                    escape_html(&batch.batch_name),
                ));
            }
            html.push_str("</optgroup>\n");
        }
        html.push_str("</select>\n");
        html.push_str(
            "<button id=\"viewBtn\" type=\"submit\" name=\"view\" value=\"1\">View Timetable</button>\n</form>\n",
        );

        html.push_str("<div id=\"timetable-section\">");
        html.push_str(self.section.markup());
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::BatchSummary;

    fn departments() -> Vec<DepartmentBatches> {
        vec![DepartmentBatches {
            department: "Computer Science".to_string(),
            batches: vec![
                BatchSummary {
                    batch_id: BatchId::new("1"),
                    batch_name: "CSE-A".to_string(),
                    department: "Computer Science".to_string(),
                },
                BatchSummary {
                    batch_id: BatchId::new("2"),
                    batch_name: "CSE-B".to_string(),
                    department: "Computer Science".to_string(),
                },
            ],
        }]
    }

    #[test]
    fn page_lists_batches_and_marks_selection() {
        let groups = departments();
        let page = ViewerPage::new(&groups, BatchId::new("2"));
        let html = page.to_html();

        assert!(html.contains("<optgroup label=\"Computer Science\">"));
        assert!(html.contains("<option value=\"1\">CSE-A</option>"));
        assert!(html.contains("<option value=\"2\" selected>CSE-B</option>"));
        assert!(html.contains("<div id=\"timetable-section\"></div>"));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn notification_and_section_are_rendered() {
        let groups = departments();
        let mut page = ViewerPage::new(&groups, BatchId::new(""));
        page.alert.notify("Please select a batch.");
        page.section.replace_contents("<table></table>".to_string());
        let html = page.to_html();

        assert_eq!(page.alert.message(), Some("Please select a batch."));
        assert_eq!(page.section.markup(), "<table></table>");
        assert!(html.contains("<div class=\"alert\" role=\"alert\">Please select a batch.</div>"));
        assert!(html.contains("<div id=\"timetable-section\"><table></table></div>"));
    }

    #[test]
    fn alert_text_is_escaped() {
        let groups = departments();
        let mut page = ViewerPage::new(&groups, BatchId::new(""));
        page.alert.notify("no timetable for batch '<x>'");
        assert!(page
            .to_html()
            .contains("no timetable for batch &#39;&lt;x&gt;&#39;"));
    }
}
