pub mod leave;

pub use leave::{CreatedLeave, LeaveService};
