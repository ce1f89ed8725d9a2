// Job Directory: CRUD over job postings. JSON in, JSON out; no uploads.

pub mod handlers;
pub mod service;
