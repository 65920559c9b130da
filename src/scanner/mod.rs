mod walk;

pub use walk::{scan, NonHardlinkedFiles};
