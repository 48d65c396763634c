//! Tickler API Types
//!
//! Request and response payloads for the HTTP surface, plus the range
//! validation that turns payloads into domain items. Everything here is
//! plain data; no I/O and no clock access.

pub mod error;
pub mod requests;
pub mod responses;

pub use error::{ApiError, Validator};
pub use requests::{
    CreateDaily, CreateEaster, CreateIrregular, CreateMonthly, CreateOnce, CreateWeekly,
    CreateXDays, CreateYearly, LoginRequest, RegisterRequest, UpdateDaily, UpdateEaster,
    UpdateIrregular, UpdateMonthly, UpdateOnce, UpdateWeekly, UpdateXDays, UpdateYearly,
};
pub use responses::{ErrorResponse, ReminderResponse, TokenResponse, UserResponse};
