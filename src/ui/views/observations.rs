use crate::model::types::Observation;
use crate::ui::renderfns::{report_color, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Draw the observation table view
pub fn draw_observation_list(
  frame: &mut Frame,
  area: Rect,
  observations: &[Observation],
  selected: usize,
  loading: bool,
) {
  let title = if loading {
    " Observations (loading...) ".to_string()
  } else {
    format!(" Observations ({}) ", observations.len())
  };

  let block = Block::default()
    .title(title)
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if observations.is_empty() {
    let content = if loading {
      "Loading observations..."
    } else {
      "No observations match the current filters."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = observations
    .iter()
    .map(|obs| {
      let line = Line::from(vec![
        Span::styled(
          obs.datetime.format("%Y-%m-%d %H:%M").to_string(),
          Style::default().fg(Color::Gray),
        ),
        Span::raw(" "),
        Span::styled(
          format!("{:>6}", obs.station_id),
          Style::default().fg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(
          format!("{:<8}", truncate(&obs.report, 8)),
          Style::default().fg(report_color(&obs.report)),
        ),
        Span::raw(" "),
        Span::styled(
          format!("{:<7}", obs.varcode),
          Style::default().fg(Color::Magenta),
        ),
        Span::raw(" "),
        Span::styled(
          format!("{:<16}", obs.level.to_string()),
          Style::default().fg(Color::White),
        ),
        Span::raw(" "),
        Span::styled(
          format!("{:<12}", obs.trange.to_string()),
          Style::default().fg(Color::White),
        ),
        Span::raw(" "),
        Span::raw(truncate(&obs.value, 20)),
      ]);
      ListItem::new(line)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected.min(observations.len().saturating_sub(1))));

  frame.render_stateful_widget(list, area, &mut state);
}
