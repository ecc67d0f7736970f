use crate::model::types::Station;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Draw the station list view
pub fn draw_station_list(
  frame: &mut Frame,
  area: Rect,
  stations: &[Station],
  selected: usize,
  loading: bool,
) {
  let title = if loading {
    " Stations (loading...) ".to_string()
  } else {
    format!(" Stations ({}) ", stations.len())
  };

  let block = Block::default()
    .title(title)
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if stations.is_empty() {
    let content = if loading {
      "Loading stations..."
    } else {
      "No stations in the database. Import data with --import."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = stations
    .iter()
    .map(|station| {
      let ident = station.ident.as_deref().unwrap_or("-");
      let line = Line::from(vec![
        Span::styled(
          format!("{:>6}", station.id),
          Style::default().fg(Color::Cyan),
        ),
        Span::raw("  "),
        Span::styled(
          format!("{:>9.4} {:>9.4}", station.lat, station.lon),
          Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(ident.to_string(), Style::default().fg(Color::Gray)),
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
  state.select(Some(selected.min(stations.len().saturating_sub(1))));

  frame.render_stateful_widget(list, area, &mut state);
}
