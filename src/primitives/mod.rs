mod payment;
mod proof;

pub use payment::*;
pub use proof::*;
