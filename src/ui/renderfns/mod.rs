mod header;
mod utils;

pub use header::{database_label, draw_header};
pub use utils::{report_color, truncate};
