//! Maud-based page templates for the dashboard.
//!
//! Each page module exports a pure render function; the handlers in
//! `routes` gather the data and pass it in.

pub mod analyze;
pub mod home;
pub mod podcast;
pub mod ptt;

pub use analyze::render_analyze_page;
pub use home::render_home_page;
pub use podcast::{render_episode_not_found_page, render_podcast_page};
pub use ptt::{render_ptt_error_page, render_ptt_page};
