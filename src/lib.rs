mod logging;
mod array_ptr;
mod vector;
mod iter;
mod traits;

pub use array_ptr::{ArrayPtr, AllocError};
pub use vector::{SimpleVector, VectorError, ReserveHint, reserve};
pub use iter::IntoIter;
pub use traits::CollectVector;

#[cfg(test)]
pub mod dropflag;
