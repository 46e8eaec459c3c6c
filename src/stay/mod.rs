pub mod availability;
pub mod quote;

pub use availability::{check_availability, is_available, BookingInterval};
pub use quote::{quote_stay, RateTier, StayQuote};
