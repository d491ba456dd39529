pub mod layout;
pub mod relocator;

pub use layout::{canonical_filename, destination_dir};
pub use relocator::{FileMover, FsMover, Relocator};
