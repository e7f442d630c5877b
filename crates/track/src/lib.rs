pub mod appearance;
pub mod path;

pub use appearance::*;
pub use path::*;
