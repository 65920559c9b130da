use std::fs::Metadata;

/// Number of hard links pointing at the file's inode.
///
/// Returns `None` on platforms where std exposes no stable link count.
#[cfg(unix)]
pub fn link_count(metadata: &Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.nlink())
}

#[cfg(not(unix))]
pub fn link_count(_metadata: &Metadata) -> Option<u64> {
    None
}
