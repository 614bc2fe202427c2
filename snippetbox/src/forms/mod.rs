//! Submitted form values with field validation
//!
//! Each validator records a message under the field name and leaves
//! already-empty fields to [`Form::required`].

mod errors;
mod form;

pub use errors::FormErrors;
pub use form::{EMAIL_RX, Form};
