pub mod carry_forward;
pub mod due_amount;
pub mod variance;

pub use carry_forward::{calculate_carry_forward, CarryForward};
pub use due_amount::{calculate_amount_due, DueAmount};
pub use variance::{classify_payment, split_disbursement, DisbursementSplit, PaymentClassification};
