// Blog Directory: posts with an optional cover image, newest first.

pub mod handlers;
pub mod service;
