pub mod app;
pub mod form;
pub mod inputs;
pub mod state;
pub mod theme;
pub mod views;
