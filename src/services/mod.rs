pub mod recommendations;

pub use recommendations::{recommend, MAX_RECOMMENDATIONS};
