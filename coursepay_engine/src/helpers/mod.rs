mod money;
mod receipt;
pub mod signature;

pub use money::to_minor_units;
pub use receipt::new_receipt;
pub use signature::{sign_message, verify_payment_signature, verify_webhook_signature, SignatureError};
