mod observations;
mod stations;

pub use observations::draw_observation_list;
pub use stations::draw_station_list;
