mod command_overlay;
mod filter_summary;
mod key_result;
mod levels_choice;
mod query_choice;
mod report_choice;
mod trange_choice;

pub use command_overlay::draw_command_overlay;
pub use filter_summary::draw_filter_summary;
pub use key_result::KeyResult;
pub use levels_choice::{LevelSource, LevelsChoice};
pub use query_choice::{ChoiceEvent, ChoiceOption, ChoiceSource, QueryChoice, SyncState};
pub use report_choice::{ReportChoice, ReportSource};
pub use trange_choice::{TrangeChoice, TrangeSource};
