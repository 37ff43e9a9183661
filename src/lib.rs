//! growthdash: client for the AI Business Growth Platform dashboard API.
//!
//! The library holds the dashboard's presentation contract (module
//! pipelines, result panels, chat session, sidebar navigation, health
//! polling); the `growthdash` binary drives it from the terminal.

pub mod activity;
pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod health;
pub mod modules;
pub mod nav;
pub mod render;
