//! Inextensible strings and the ribbon frames that follow them.

mod ribbon;
mod string3d;

pub use ribbon::Ribbon;
pub use string3d::{Constraints, StepOutput, String3D};
