pub mod page;
pub mod sort;

pub use page::*;
pub use sort::*;
