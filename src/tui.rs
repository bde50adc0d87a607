//! Terminal front end: app state, key handling and drawing.

pub mod app;
pub mod controller;
pub mod ui;
