// Generic Image Upload: store any image, remember when, hand back the newest.

pub mod handlers;
pub mod service;
