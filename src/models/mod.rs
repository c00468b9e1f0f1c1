pub mod availability_input;
pub mod check_in;
pub mod contract;
pub mod duration_input;
pub mod generation_input;
pub mod job;

pub use availability_input::{AvailabilityInput, AvailabilityResponse, EmployeeAvailability};
pub use check_in::{CheckIn, CheckInInput, CheckInResponse, JobSite};
pub use contract::{Contract, ContractStatus, DayOfWeek, ScheduleDayTemplate};
pub use duration_input::{ParseDurationInput, ParseDurationResponse};
pub use generation_input::{GenerateJobsInput, GenerateJobsResponse, GenerationPreview, ScheduleConflict};
pub use job::{Job, JobInstanceDraft, JobStatus};
