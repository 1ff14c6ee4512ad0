pub mod config;
pub mod logging;
pub mod report;

pub mod catalog;
pub mod classify;
pub mod control;
pub mod fetch_page;
pub mod listing;
pub mod search;
pub mod walker;
