pub mod errors;
pub mod lenient;
pub mod shutdown;
pub mod text;

pub use errors::*;
pub use shutdown::*;
