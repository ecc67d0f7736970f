use ratatui::prelude::Color;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.len() <= max_len {
    s.to_string()
  } else {
    format!("{}...", &s[..max_len.saturating_sub(3)])
  }
}

/// Display color for a report memo
pub fn report_color(report: &str) -> Color {
  match report {
    "synop" | "metar" | "ship" | "buoy" => Color::Green,
    "temp" | "pilot" | "airep" => Color::Yellow,
    _ => Color::White,
  }
}
