mod status;
mod telegram;
mod webhook;

pub mod dtos {
    pub use crate::telegram::dtos::*;
}

pub use crate::status::api::*;
pub use crate::telegram::api::*;
pub use crate::webhook::api::*;
