mod lenient;
mod manager;
mod requests;

pub use manager::{build_set_details, MissingMenuPolicy, TrainingError, TrainingManager};
pub use requests::{DeleteRecordRequest, InsertMenuRequest, InsertRecordRequest};
