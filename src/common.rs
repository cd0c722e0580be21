pub mod cancel;
pub mod diagnostics;
pub mod error;

pub use cancel::{Cancelamento, GatilhoCancelamento};
pub use diagnostics::{Diagnostico, BUILD_ID};
pub use error::AppError;
