//! One-line summary of the active query filters.

use crate::model::record::QueryRecord;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Build the labelled parts of the summary, in display order
fn summary_parts(record: &QueryRecord) -> Vec<(&'static str, String)> {
  let mut parts = Vec::new();
  if let Some(level) = record.level {
    parts.push(("level", level.to_string()));
  }
  if let Some(trange) = record.trange {
    parts.push(("trange", trange.to_string()));
  }
  if let Some(ref report) = record.report {
    parts.push(("report", report.clone()));
  }
  if let Some(station) = record.station {
    parts.push(("station", station.to_string()));
  }
  if let Some(ref varcode) = record.varcode {
    parts.push(("var", varcode.clone()));
  }
  parts
}

/// Render the filter summary line; blank when no filter is active
pub fn draw_filter_summary(frame: &mut Frame, area: Rect, record: &QueryRecord) {
  if record.is_empty() {
    return;
  }

  let mut spans = vec![Span::styled(
    " [filters] ",
    Style::default().fg(Color::Yellow),
  )];

  for (i, (name, value)) in summary_parts(record).into_iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::styled(
      format!("{}=", name),
      Style::default().fg(Color::Gray),
    ));
    spans.push(Span::styled(value, Style::default().fg(Color::Cyan)));
  }

  let paragraph = Paragraph::new(Line::from(spans));
  frame.render_widget(paragraph, area);
}
