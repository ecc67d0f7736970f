use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with logo, database name, and shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, database: &str) {
  let header = Line::from(vec![
    Span::styled(" osserva ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", database),
      Style::default().fg(Color::Yellow).bold(),
    ),
    Span::raw("  "),
    Span::styled("<l>", Style::default().fg(Color::Cyan)),
    Span::styled(" levels", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<t>", Style::default().fg(Color::Cyan)),
    Span::styled(" tranges", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<p>", Style::default().fg(Color::Cyan)),
    Span::styled(" reports", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<:>", Style::default().fg(Color::Cyan)),
    Span::styled(" command", Style::default().fg(Color::DarkGray)),
  ]);

  let paragraph = Paragraph::new(header).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Short display name for a database path
pub fn database_label(path: &str) -> &str {
  path.rsplit('/').next().unwrap_or(path)
}
