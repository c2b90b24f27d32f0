mod pursuit;
pub use pursuit::{Body, PursuitParams};
