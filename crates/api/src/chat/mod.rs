pub mod set_digest_time;
pub mod set_timezone;
