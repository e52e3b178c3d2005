pub mod app;
pub mod theme;
pub mod ticker;
pub mod tree;
pub mod view;
