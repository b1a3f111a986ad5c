pub mod dom;
pub mod affiliate;
pub mod updater;

#[cfg(test)]
pub(crate) mod testing;

pub use dom::*;
pub use affiliate::*;
pub use updater::*;
