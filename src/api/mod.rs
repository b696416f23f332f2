pub mod device_token;
pub mod leave_request;
pub mod leave_type;
