pub mod components;
mod renderfns;
mod views;

use crate::app::{App, Mode, ViewState};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Length(1), // Filter summary
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let database = app.database().to_string_lossy();
  renderfns::draw_header(
    frame,
    chunks[0],
    app.title(),
    renderfns::database_label(&database),
  );

  components::draw_filter_summary(frame, chunks[1], app.model().record());

  // Draw current view
  match app.view() {
    ViewState::ObservationList { selected, loading } => {
      views::draw_observation_list(
        frame,
        chunks[2],
        app.model().observations(),
        *selected,
        *loading,
      );
    }
    ViewState::StationList { selected, loading } => {
      views::draw_station_list(frame, chunks[2], app.model().stations(), *selected, *loading);
    }
  }

  draw_status_bar(frame, chunks[3], app);

  // Overlays go last, on top of the content area
  app.levels_choice().render_overlay(frame, chunks[2]);
  app.trange_choice().render_overlay(frame, chunks[2]);
  app.report_choice().render_overlay(frame, chunks[2]);

  if *app.mode() == Mode::Command {
    let suggestions = app.autocomplete_suggestions();
    components::draw_command_overlay(
      frame,
      chunks[2],
      app.command_input(),
      &suggestions,
      app.selected_suggestion(),
    );
  }
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = match app.mode() {
    Mode::Normal => {
      if let Some(error) = app.status() {
        (format!(" {}", error), Style::default().fg(Color::Red))
      } else {
        let hint =
          " :command  l/t/p:filters  j/k:nav  Enter:select  r:reload  c:clear  q:quit";
        (hint.to_string(), Style::default().fg(Color::DarkGray))
      }
    }
    Mode::Command => {
      let cmd = format!(":{}", app.command_input());
      (cmd, Style::default().fg(Color::Yellow))
    }
  };

  let paragraph = Paragraph::new(content).style(style);
  frame.render_widget(paragraph, area);
}
