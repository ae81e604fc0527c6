//! guidewiki: a terminal guide viewer with a scroll-synchronised outline.
//!
//! A guide is a tree of collapsible sections. The viewer renders it as nested
//! cards, lists its top-level sections in an outline panel, highlights the
//! section the reader is currently in, and scrolls to a section when its
//! outline entry is chosen.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod config;
pub mod error;
pub mod formats;
pub mod guide;
pub mod outline;
pub mod outline_panel;
pub mod render;
pub mod scroll_sync;
pub mod ui;
pub mod viewport;
