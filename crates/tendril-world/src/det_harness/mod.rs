pub mod types;

pub use types::{InputEvent, Inputs, SimWorld, StepReport};
