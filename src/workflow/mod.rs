pub mod booking;
pub mod payment;

pub use booking::{
    billable_days, total_amount, validate_dates, BookingGateway, BookingState, BookingWorkflow,
    Quote,
};
pub use payment::{
    PaymentGateway, PaymentOutcome, PaymentProcessor, PaymentWorkflow, ProcessorReceipt,
    SimulatedUpiProcessor,
};
