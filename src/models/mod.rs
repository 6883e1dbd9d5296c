pub mod course;
pub mod outcome;
pub mod response;

pub use course::{Course, RemoteCourse};
pub use outcome::{AbortReason, AttemptOutcome, SearchOutcome, SignInOutcome};
pub use response::{CourseListResponse, SignInResponse};
