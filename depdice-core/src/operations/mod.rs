pub mod pick;

pub use pick::{Pick, Usage, choose, pick};
