/// Background maintenance loops
pub mod job_sweeper;

pub use job_sweeper::start_job_sweeper;
