pub mod application;
pub mod blog;
pub mod image;
pub mod job;

pub use application::{ApplicantFields, Application, ApplicationWithJob, NewApplication};
pub use blog::{Blog, BlogFields, BlogUpdate};
pub use image::{Image, NewImage};
pub use job::{Job, JobFields};
