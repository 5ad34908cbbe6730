pub mod accessor;
pub mod error;
pub mod fake;
pub mod readiness;
pub mod scripts;
pub mod webdriver;
