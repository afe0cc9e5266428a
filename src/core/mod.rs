pub mod validation;

pub use validation::{validate_cookie_text, validate_for_save};
