//! Input sanitization for dashboard forms and roster uploads.
//!
//! Every function here is total: input that is not text (JSON `null`, a
//! number, a missing field) is treated as the empty string rather than an
//! error. See [`hps_model::RawText`].
//!
//! # Modules
//!
//! - [`text`]: HTML escaping, truncation, name/ID/email normalization
//! - [`domain`]: staff email domain allow-listing
//! - [`rate_limit`]: named fixed-window rate limiters with an injectable clock

pub mod domain;
pub mod error;
pub mod rate_limit;
pub mod text;

pub use domain::{DEFAULT_ALLOWED_DOMAIN, DomainAllowList, is_allowed_domain};
pub use error::RateLimitError;
pub use rate_limit::{
    Clock, ManualClock, RateLimitConfig, RateLimitStatus, RateLimiter, RateLimiters, SystemClock,
};
pub use text::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_STUDENT_ID_LEN, MAX_TEXT_LEN, escape_html, sanitize_email,
    sanitize_student_id, sanitize_student_name, sanitize_text, truncate_chars,
};
