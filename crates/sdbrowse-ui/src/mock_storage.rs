//! Mock Storage Implementation for Host Tests
//!
//! Provides a simple in-memory directory tree with knobs for the failure
//! modes the browser has to survive: slow or absent cards, unreadable
//! directories, and cards that vanish after a while.

use core::ops::ControlFlow;
use std::collections::{BTreeMap, BTreeSet};
use std::string::{String, ToString};
use std::vec::Vec;

use crate::path;
use crate::storage::{Storage, StorageError};

/// In-memory node
#[derive(Clone)]
enum MockNode {
    File,
    Directory { children: Vec<String> },
}

/// Mock storage for tests and host tooling
///
/// Children are reported in insertion order, like an unsorted FAT directory.
pub struct MockStorage {
    nodes: BTreeMap<String, MockNode>,
    ready: bool,
    failing_inits: Option<u32>,
    unreadable: BTreeSet<String>,
    reads_before_failure: Option<usize>,
    init_attempts: u32,
    read_log: Vec<String>,
}

impl MockStorage {
    /// Create new mock storage with a small sample tree
    pub fn new() -> Self {
        let mut fs = Self::empty();

        fs.add_directory("/books");
        fs.add_directory("/music");
        fs.add_file("/readme.txt");
        fs.add_file("/books/dune.txt");
        fs.add_file("/books/emma.txt");
        fs.add_directory("/books/poetry");
        fs.add_file("/books/poetry/odes.txt");
        fs.add_file("/music/track01.mp3");

        fs
    }

    /// Create mock storage holding only the root directory
    pub fn empty() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            path::ROOT.to_string(),
            MockNode::Directory {
                children: Vec::new(),
            },
        );
        Self {
            nodes,
            ready: true,
            failing_inits: None,
            unreadable: BTreeSet::new(),
            reads_before_failure: None,
            init_attempts: 0,
            read_log: Vec::new(),
        }
    }

    /// Add a file; its parent directory must already exist
    pub fn add_file(&mut self, path: &str) {
        self.insert(path, MockNode::File);
    }

    /// Add a directory; its parent directory must already exist
    pub fn add_directory(&mut self, path: &str) {
        if self.nodes.contains_key(path) {
            return;
        }
        self.insert(
            path,
            MockNode::Directory {
                children: Vec::new(),
            },
        );
    }

    fn insert(&mut self, path: &str, node: MockNode) {
        self.nodes.insert(path.to_string(), node);
        if path::is_root(path) {
            return;
        }

        let parent = path::parent(path);
        if let Some(MockNode::Directory { children }) = self.nodes.get_mut(parent.as_str()) {
            let name = path::basename(path).to_string();
            if !children.contains(&name) {
                children.push(name);
            }
        }
    }

    /// Card is not ready until `failures` init attempts have failed
    pub fn ready_after(mut self, failures: u32) -> Self {
        self.ready = false;
        self.failing_inits = Some(failures);
        self
    }

    /// Card never comes up
    pub fn never_ready(mut self) -> Self {
        self.ready = false;
        self.failing_inits = None;
        self
    }

    /// Directory stays listed in its parent but cannot be opened
    pub fn make_unreadable(&mut self, path: &str) {
        self.unreadable.insert(path.to_string());
    }

    /// Every `read_dir` after the first `reads` calls fails with `Io`
    pub fn fail_reads_after(&mut self, reads: usize) {
        self.reads_before_failure = Some(reads);
    }

    /// Number of `init` calls so far
    pub fn init_attempts(&self) -> u32 {
        self.init_attempts
    }

    /// Paths passed to `read_dir`, oldest first
    pub fn read_log(&self) -> &[String] {
        &self.read_log
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MockStorage {
    fn init(&mut self) -> Result<(), StorageError> {
        self.init_attempts += 1;
        if self.ready {
            return Ok(());
        }
        match self.failing_inits.as_mut() {
            Some(0) => {
                self.ready = true;
                Ok(())
            }
            Some(remaining) => {
                *remaining -= 1;
                Err(StorageError::NotReady)
            }
            None => Err(StorageError::NotReady),
        }
    }

    fn read_dir(
        &mut self,
        path: &str,
        visit: &mut dyn FnMut(&str, bool) -> ControlFlow<()>,
    ) -> Result<(), StorageError> {
        self.read_log.push(path.to_string());
        if !self.ready {
            return Err(StorageError::NotReady);
        }
        if let Some(limit) = self.reads_before_failure {
            if self.read_log.len() > limit {
                return Err(StorageError::Io);
            }
        }
        if self.unreadable.contains(path) {
            return Err(StorageError::NotFound);
        }

        let children = match self.nodes.get(path) {
            Some(MockNode::Directory { children }) => children,
            Some(MockNode::File) => return Err(StorageError::NotADirectory),
            None => return Err(StorageError::NotFound),
        };

        for name in children {
            let child_path = path::join(path, name);
            let is_directory = matches!(
                self.nodes.get(child_path.as_str()),
                Some(MockNode::Directory { .. })
            );
            if visit(name.as_str(), is_directory).is_break() {
                break;
            }
        }
        Ok(())
    }
}
