mod reader;
mod reading;

pub use reader::*;
pub use reading::*;
