mod file;

pub use file::{ConfigStore, Mirror};
