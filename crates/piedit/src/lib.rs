pub mod config;
pub mod editor;
pub mod events;
pub mod gui;
pub mod sys;
