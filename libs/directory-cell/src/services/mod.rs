pub mod directory;

pub use directory::{render_directory, DirectoryService};
