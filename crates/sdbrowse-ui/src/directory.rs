//! Directory listing model: the entry table for the current path plus the
//! selection and scroll state over a fixed-height window.

use core::ops::ControlFlow;

use heapless::{String, Vec};

use crate::path::{self, PathBuf};
use crate::storage::{Storage, StorageError};

/// Maximum number of entries kept per directory
pub const ENTRY_CAPACITY: usize = 50;
/// Maximum stored entry name length in bytes
pub const NAME_CAPACITY: usize = 31;

/// Bounded entry name
pub type EntryName = String<NAME_CAPACITY>;

/// One child of the current directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: EntryName,
    is_directory: bool,
}

impl Entry {
    /// Names longer than [`NAME_CAPACITY`] bytes are truncated.
    pub fn new(name: &str, is_directory: bool) -> Self {
        Self {
            name: path::bounded(name),
            is_directory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }
}

/// Keeps files ending in `.<suffix>` (ASCII case-insensitive) and every
/// directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionFilter {
    suffix: [u8; 3],
}

impl ExtensionFilter {
    /// Parse a three-character suffix such as `"txt"`
    pub fn parse(suffix: &str) -> Option<Self> {
        let bytes = suffix.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphanumeric) {
            return None;
        }
        Some(Self {
            suffix: [bytes[0], bytes[1], bytes[2]],
        })
    }

    pub fn accepts(&self, name: &str, is_directory: bool) -> bool {
        if is_directory {
            return true;
        }
        let bytes = name.as_bytes();
        if bytes.len() < 4 {
            return false;
        }
        let tail = &bytes[bytes.len() - 4..];
        tail[0] == b'.' && tail[1..].eq_ignore_ascii_case(&self.suffix)
    }
}

/// Why a directory could not be loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryError {
    NotFound,
    NotADirectory,
    /// Device-level failure while opening or enumerating
    Storage(StorageError),
}

impl From<StorageError> for DirectoryError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => DirectoryError::NotFound,
            StorageError::NotADirectory => DirectoryError::NotADirectory,
            other => DirectoryError::Storage(other),
        }
    }
}

impl core::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DirectoryError::NotFound => write!(f, "Directory not found"),
            DirectoryError::NotADirectory => write!(f, "Not a directory"),
            DirectoryError::Storage(err) => write!(f, "{}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DirectoryError {}

/// Current directory state
///
/// Invariant, whenever the table is non-empty:
/// `scroll_offset <= selection_index < scroll_offset + visible_rows` and the
/// window never extends past the last entry once at least `visible_rows`
/// entries exist. An empty table has selection and scroll at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryModel {
    entries: Vec<Entry, ENTRY_CAPACITY>,
    selection_index: usize,
    scroll_offset: usize,
    current_path: PathBuf,
    visible_rows: usize,
}

impl DirectoryModel {
    /// Empty model at root
    pub fn new(visible_rows: usize) -> Self {
        Self {
            entries: Vec::new(),
            selection_index: 0,
            scroll_offset: 0,
            current_path: path::root(),
            visible_rows: visible_rows.max(1),
        }
    }

    /// Replace the listing with the children of `path`
    ///
    /// The new listing is built from scratch and only committed, together with
    /// `path`, once enumeration succeeded. On error the model is untouched.
    /// At most [`ENTRY_CAPACITY`] entries are kept; later ones are dropped.
    pub fn load<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        path: &str,
        filter: Option<ExtensionFilter>,
    ) -> Result<(), DirectoryError> {
        let mut entries: Vec<Entry, ENTRY_CAPACITY> = Vec::new();
        let mut truncated = false;

        storage.read_dir(path, &mut |name: &str, is_directory: bool| {
            if let Some(filter) = filter {
                if !filter.accepts(name, is_directory) {
                    return ControlFlow::Continue(());
                }
            }
            if entries.push(Entry::new(name, is_directory)).is_err() {
                truncated = true;
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })?;

        self.entries = entries;
        self.selection_index = 0;
        self.scroll_offset = 0;
        self.current_path = path::bounded(path);
        self.clamp_scroll();

        log::info!("LOAD: {} entries in '{}'", self.entries.len(), self.current_path);
        for (i, entry) in self.entries.iter().take(5).enumerate() {
            let kind = if entry.is_directory { "DIR" } else { "FILE" };
            log::info!("  [{}] {} ({})", i, entry.name, kind);
        }
        if truncated {
            log::warn!(
                "LOAD: '{}' has more than {} entries, rest dropped",
                self.current_path,
                ENTRY_CAPACITY
            );
        }

        Ok(())
    }

    /// Clear the table and point the model back at root
    pub fn reset_to_root(&mut self) {
        self.entries.clear();
        self.selection_index = 0;
        self.scroll_offset = 0;
        self.current_path = path::root();
    }

    /// Re-establish the selection/scroll invariant
    ///
    /// Moving past the bottom of the window places the selection on the last
    /// visible row.
    pub fn clamp_scroll(&mut self) {
        let count = self.entries.len();
        if count == 0 {
            self.selection_index = 0;
            self.scroll_offset = 0;
            return;
        }

        self.selection_index = self.selection_index.min(count - 1);
        if self.selection_index < self.scroll_offset {
            self.scroll_offset = self.selection_index;
        }
        if self.selection_index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = self.selection_index - (self.visible_rows - 1);
        }
        let max_scroll = count.saturating_sub(self.visible_rows);
        self.scroll_offset = self.scroll_offset.min(max_scroll);
    }

    /// Move the selection one entry forward, wrapping to the top
    pub fn advance_selection(&mut self) {
        let count = self.entries.len();
        if count == 0 {
            return;
        }
        self.selection_index = (self.selection_index + 1) % count;
        self.clamp_scroll();
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn selection_index(&self) -> usize {
        self.selection_index
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn is_at_root(&self) -> bool {
        path::is_root(&self.current_path)
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.selection_index)
    }

    /// Entries inside the visible window with their absolute indices
    pub fn visible_entries(&self) -> impl Iterator<Item = (usize, &Entry)> {
        self.entries
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(self.visible_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_storage::MockStorage;

    fn storage_with(entries: &[(&str, bool)]) -> MockStorage {
        let mut fs = MockStorage::empty();
        for (name, is_dir) in entries {
            let path = path::join("/", name);
            if *is_dir {
                fs.add_directory(&path);
            } else {
                fs.add_file(&path);
            }
        }
        fs
    }

    fn numbered_files(count: usize) -> MockStorage {
        let mut fs = MockStorage::empty();
        for i in 0..count {
            fs.add_file(&std::format!("/file{:02}.txt", i));
        }
        fs
    }

    fn loaded(fs: &mut MockStorage, visible: usize) -> DirectoryModel {
        let mut model = DirectoryModel::new(visible);
        model.load(fs, "/", None).unwrap();
        model
    }

    fn assert_window_invariant(model: &DirectoryModel) {
        let count = model.entry_count();
        if count == 0 {
            assert_eq!(model.selection_index(), 0);
            assert_eq!(model.scroll_offset(), 0);
            return;
        }
        let (sel, scroll, rows) = (
            model.selection_index(),
            model.scroll_offset(),
            model.visible_rows(),
        );
        assert!(scroll <= sel, "scroll {scroll} > selection {sel}");
        assert!(sel < scroll + rows, "selection {sel} outside window at {scroll}");
        if count <= rows {
            assert_eq!(scroll, 0);
        } else {
            assert!(scroll + rows <= count);
        }
    }

    #[test]
    fn test_load_keeps_storage_order() {
        let mut fs = storage_with(&[("A", true), ("b.txt", false), ("C", true)]);
        let model = loaded(&mut fs, 5);

        let names: std::vec::Vec<&str> = model.entries().iter().map(Entry::name).collect();
        assert_eq!(names, ["A", "b.txt", "C"]);
        assert!(model.entries()[0].is_directory());
        assert!(!model.entries()[1].is_directory());
        assert_eq!(model.current_path(), "/");
        assert_eq!(model.selection_index(), 0);
    }

    #[test]
    fn test_load_truncates_at_capacity() {
        let mut fs = numbered_files(ENTRY_CAPACITY + 12);
        let model = loaded(&mut fs, 5);

        assert_eq!(model.entry_count(), ENTRY_CAPACITY);
        for (i, entry) in model.entries().iter().enumerate() {
            assert_eq!(entry.name(), std::format!("file{:02}.txt", i));
        }
    }

    #[test]
    fn test_load_truncates_long_names() {
        let long = "a_really_long_file_name_that_keeps_going.txt";
        let mut fs = storage_with(&[(long, false)]);
        let model = loaded(&mut fs, 5);

        assert_eq!(model.entries()[0].name().len(), NAME_CAPACITY);
        assert_eq!(model.entries()[0].name(), &long[..NAME_CAPACITY]);
    }

    #[test]
    fn test_load_empty_directory_is_ok() {
        let mut fs = MockStorage::empty();
        fs.add_directory("/empty");
        let mut model = DirectoryModel::new(5);
        model.load(&mut fs, "/empty", None).unwrap();

        assert_eq!(model.entry_count(), 0);
        assert_eq!(model.current_path(), "/empty");
        assert!(model.selected_entry().is_none());
        assert_window_invariant(&model);
    }

    #[test]
    fn test_load_errors_leave_model_untouched() {
        let mut fs = storage_with(&[("A", true), ("b.txt", false)]);
        let mut model = loaded(&mut fs, 5);
        model.advance_selection();
        let before = model.clone();

        assert_eq!(
            model.load(&mut fs, "/missing", None),
            Err(DirectoryError::NotFound)
        );
        assert_eq!(
            model.load(&mut fs, "/b.txt", None),
            Err(DirectoryError::NotADirectory)
        );
        assert_eq!(model, before);
    }

    #[test]
    fn test_extension_filter() {
        let mut fs = storage_with(&[
            ("notes.TXT", false),
            ("photo.jpg", false),
            ("Music", true),
            ("txt", false),
            ("readme.txt", false),
        ]);
        let filter = ExtensionFilter::parse("txt");
        let mut model = DirectoryModel::new(5);
        model.load(&mut fs, "/", filter).unwrap();

        let names: std::vec::Vec<&str> = model.entries().iter().map(Entry::name).collect();
        assert_eq!(names, ["notes.TXT", "Music", "readme.txt"]);
    }

    #[test]
    fn test_filter_never_drops_directories() {
        let filter = ExtensionFilter::parse("bmp").unwrap();
        assert!(filter.accepts("DCIM", true));
        assert!(filter.accepts("x", true));
        assert!(filter.accepts("logo.BMP", false));
        assert!(!filter.accepts("logo.bmpx", false));
        assert!(!filter.accepts("logobmp", false));
    }

    #[test]
    fn test_scenario_three_entries() {
        let mut fs = storage_with(&[("A", true), ("b.txt", false), ("C", true)]);
        let mut model = loaded(&mut fs, 5);

        model.advance_selection();
        assert_eq!(model.selection_index(), 1);
        assert_eq!(model.scroll_offset(), 0);
        assert_eq!(model.selected_entry().map(Entry::name), Some("b.txt"));
    }

    #[test]
    fn test_scroll_pushes_selection_to_last_row() {
        let mut fs = numbered_files(7);
        let mut model = loaded(&mut fs, 5);

        let mut scrolls = std::vec::Vec::new();
        for _ in 0..6 {
            model.advance_selection();
            scrolls.push(model.scroll_offset());
        }
        assert_eq!(scrolls, [0, 0, 0, 0, 1, 2]);
        assert_eq!(model.selection_index(), 6);
        assert_eq!(model.scroll_offset(), 2);

        model.advance_selection();
        assert_eq!(model.selection_index(), 0);
        assert_eq!(model.scroll_offset(), 0);
    }

    #[test]
    fn test_invariant_holds_for_every_advance() {
        for count in [1, 2, 4, 5, 6, 11, ENTRY_CAPACITY] {
            for rows in [1, 3, 5] {
                let mut fs = numbered_files(count);
                let mut model = loaded(&mut fs, rows);
                for _ in 0..(count * 2 + 3) {
                    model.advance_selection();
                    assert_window_invariant(&model);
                }
            }
        }
    }

    #[test]
    fn test_advance_is_cyclic() {
        for count in [1, 3, 7, 23] {
            let mut fs = numbered_files(count);
            let mut model = loaded(&mut fs, 5);
            model.advance_selection();
            model.advance_selection();
            let start = model.selection_index();
            for _ in 0..count {
                model.advance_selection();
            }
            assert_eq!(model.selection_index(), start, "count {count}");
        }
    }

    #[test]
    fn test_advance_on_empty_is_noop() {
        let mut model = DirectoryModel::new(5);
        model.advance_selection();
        assert_eq!(model.selection_index(), 0);
        assert_eq!(model.scroll_offset(), 0);
    }

    #[test]
    fn test_clamp_repairs_out_of_range_state() {
        let mut fs = numbered_files(8);
        let mut model = loaded(&mut fs, 5);
        model.selection_index = 42;
        model.scroll_offset = 40;
        model.clamp_scroll();
        assert_eq!(model.selection_index(), 7);
        assert_eq!(model.scroll_offset(), 3);

        model.selection_index = 1;
        model.clamp_scroll();
        assert_eq!(model.scroll_offset(), 1);
        assert_window_invariant(&model);
    }

    #[test]
    fn test_visible_entries_window() {
        let mut fs = numbered_files(9);
        let mut model = loaded(&mut fs, 5);
        for _ in 0..7 {
            model.advance_selection();
        }
        let indices: std::vec::Vec<usize> = model.visible_entries().map(|(i, _)| i).collect();
        assert_eq!(indices, [3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_reset_to_root() {
        let mut fs = MockStorage::new();
        let mut model = DirectoryModel::new(5);
        model.load(&mut fs, "/books", None).unwrap();
        assert!(!model.is_at_root());

        model.reset_to_root();
        assert!(model.is_at_root());
        assert_eq!(model.entry_count(), 0);
    }
}
