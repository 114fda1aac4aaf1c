pub mod ball_table;
pub mod preview;
