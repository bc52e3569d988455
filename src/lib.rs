//! # Thyme
//!
//! A local time tracker: projects arranged in a tree, time entries logged
//! against them, and reports that add the time up per project.
//!
//! The pure logic lives in [`core`]. Storage is a SQLite file handled by
//! [`db`], the command line in [`cli`], and the interactive report browser
//! in [`app`] and [`ui`].
//!
//! ```rust,no_run
//! use thyme::core::{calculate_duration, format_duration};
//! use thyme::types::ClockTime;
//!
//! let start: ClockTime = "09:00".parse()?;
//! let end: ClockTime = "10:30".parse()?;
//! assert_eq!(format_duration(calculate_duration(start, end)), "01:30");
//! # Ok::<(), thyme::error::Error>(())
//! ```

pub mod app;
pub mod cli;
pub mod core;
pub mod db;
pub mod error;
pub mod event;
pub mod id;
pub mod logging;
pub mod settings;
pub mod tui;
pub mod types;
pub mod ui;
pub mod view;
