//! Scopin
pub mod core;
pub mod data;
pub mod font_source;
pub mod logging;
pub mod pipeline;
pub mod scene;
pub mod signal;
pub mod trace;
