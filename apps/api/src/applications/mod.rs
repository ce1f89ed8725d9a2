// Application Intake: a resume upload plus applicant fields, linked to a job.
//
// Order of work in `submit`: every presence and file-type check runs before
// the upload, so a submission that cannot be recorded never reaches the media
// host. The job reference itself is not checked.

pub mod handlers;
pub mod service;
