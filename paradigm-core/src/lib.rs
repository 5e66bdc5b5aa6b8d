pub mod config;
pub mod display;
pub mod editor;
pub mod engine;
pub mod gateway;
