pub mod app_settings;
pub mod app_state;
pub mod batting_order;
pub mod directory;
pub mod live_status;
pub mod messages;
pub mod network;
pub mod refresher;
pub mod scoring;
pub mod wicket;
