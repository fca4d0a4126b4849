//! depthdeck: a markdown slide presenter with a layered parallax background.
//!
//! The [`deck`] module holds the windowless controller; [`app`] draws it with
//! egui.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod deck;
pub mod input;
pub mod logging;
pub mod parser;
pub mod session;
pub mod theme;
