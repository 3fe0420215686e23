mod encoding;
mod entry;
mod map_fs;
mod mock_fs;
mod stream;

pub use encoding::Encoding;
pub use entry::{Entry, EntryType, FileAttributes, Timestamps};
pub use map_fs::MapFS;
pub use mock_fs::MockFileSystem;
pub use stream::{FileStream, OpenMode, StreamOptions};
