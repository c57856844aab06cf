//! In-memory [`HostFs`] for tests that need host-absolute layouts such as a
//! symlinked `/tmp` or populated deny-listed roots

use crate::host::{FileKind, HostFs};
use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

const MAX_LINK_DEPTH: u32 = 40;

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File,
    Fifo,
    Symlink(PathBuf),
}

#[derive(Debug, Clone)]
pub struct MemoryFs {
    nodes: BTreeMap<PathBuf, Node>,
}

impl MemoryFs {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(PathBuf::from("/"), Node::Dir);
        Self { nodes }
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.insert(path, Node::Dir);
        self
    }

    pub fn file(mut self, path: &str) -> Self {
        self.insert(path, Node::File);
        self
    }

    pub fn fifo(mut self, path: &str) -> Self {
        self.insert(path, Node::Fifo);
        self
    }

    pub fn symlink(mut self, path: &str, target: &str) -> Self {
        self.insert(path, Node::Symlink(PathBuf::from(target)));
        self
    }

    fn insert(&mut self, path: &str, node: Node) {
        let path = path_clean::clean(path);
        for ancestor in path.ancestors().skip(1) {
            self.nodes
                .entry(ancestor.to_path_buf())
                .or_insert(Node::Dir);
        }
        self.nodes.insert(path, node);
    }

    /// Physical location of the last component of `path`, following every
    /// symlink before it but not the last one.
    ///
    /// `..` is applied to the resolved directory, as the kernel does, so it
    /// cannot be cleaned away lexically up front.
    fn locate(&self, path: &Path, depth: u32) -> io::Result<PathBuf> {
        if depth > MAX_LINK_DEPTH {
            return Err(io::Error::new(io::ErrorKind::Other, "too many levels of symbolic links"));
        }

        let mut current = PathBuf::from("/");
        let mut components = path.components().peekable();
        while let Some(component) = components.next() {
            match component {
                Component::Normal(name) => {
                    let next = current.join(name);
                    if components.peek().is_none() {
                        return Ok(next);
                    }
                    current = self.follow(&next, depth)?;
                }
                Component::ParentDir => {
                    current.pop();
                }
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            }
        }

        Ok(current)
    }

    /// Resolve `path` (already located) to the directory it names
    fn follow(&self, path: &Path, depth: u32) -> io::Result<PathBuf> {
        match self.nodes.get(path) {
            Some(Node::Dir) => Ok(path.to_path_buf()),
            Some(Node::Symlink(target)) => {
                let parent = path.parent().unwrap_or_else(|| Path::new("/"));
                let located = self.locate(&parent.join(target), depth + 1)?;
                self.follow(&located, depth + 1)
            }
            Some(_) => Err(io::Error::new(io::ErrorKind::Other, "not a directory")),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }
}

impl HostFs for MemoryFs {
    fn file_kind(&self, path: &Path) -> io::Result<FileKind> {
        let located = self.locate(path, 0)?;
        match self.nodes.get(&located) {
            Some(Node::Dir) => Ok(FileKind::Directory),
            Some(Node::File) => Ok(FileKind::Regular),
            Some(Node::Fifo) => Ok(FileKind::Other),
            Some(Node::Symlink(_)) => Ok(FileKind::Symlink),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        let located = self.locate(path, 0)?;
        match self.nodes.get(&located) {
            Some(Node::Symlink(target)) => Ok(target.clone()),
            Some(_) => Err(io::Error::from(io::ErrorKind::InvalidInput)),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_through_intermediate_symlink() {
        let fs = MemoryFs::new()
            .dir("/mnt/real/sub")
            .symlink("/data", "/mnt/real");

        assert_eq!(fs.file_kind(Path::new("/data")).unwrap(), FileKind::Symlink);
        assert_eq!(fs.file_kind(Path::new("/data/sub")).unwrap(), FileKind::Directory);
        assert!(fs.file_kind(Path::new("/data/missing")).is_err());
    }

    #[test]
    fn test_relative_link_target() {
        let fs = MemoryFs::new().dir("/srv/a").symlink("/srv/b", "a");

        assert_eq!(fs.resolve_link(Path::new("/srv/b")).unwrap(), PathBuf::from("/srv/a"));
        assert!(fs.is_symlink(Path::new("/srv/b")));
        assert!(fs.is_dir(Path::new("/srv/a")));
    }

    #[test]
    fn test_builder_paths_are_cleaned() {
        let fs = MemoryFs::new().dir("/srv//a/./b/").file("/srv/a/../c");

        assert_eq!(fs.file_kind(Path::new("/srv/a/b")).unwrap(), FileKind::Directory);
        assert_eq!(fs.file_kind(Path::new("/srv/c")).unwrap(), FileKind::Regular);
    }
}
