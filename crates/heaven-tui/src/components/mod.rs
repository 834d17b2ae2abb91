pub mod community;
pub mod donation;
pub mod header;
pub mod next_track;
pub mod schedule;
pub mod status_bar;
