mod competitive;
mod platform;
mod result;
mod social;

pub use competitive::*;
pub use platform::*;
pub use result::*;
pub use social::*;
