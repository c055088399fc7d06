//! Font file I/O: UFO conversion and storage, binary and web font output

pub mod compiler;
pub mod conversions;
pub mod ufo;
pub mod woff2;
