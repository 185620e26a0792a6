//! Live shader editing.
//!
//! The workbench scans a directory for shader files, loads the selected
//! file into an in-memory text buffer for editing, and on recompile writes
//! the buffer back to disk before rebuilding the program. Disk is the
//! single source of truth at recompile time: what you see running is always
//! what the file contains.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

/// Extension a file must carry to be picked up by the scan.
const SHADER_EXT: &str = "wgsl";

pub struct ShaderWorkbench {
    dir: PathBuf,
    files: Vec<PathBuf>,
    selected: Option<usize>,
    buffer: String,
    dirty: bool,
}

impl ShaderWorkbench {
    /// Scans `dir` for shader files. An unreadable or empty directory is not
    /// an error; the workbench simply has nothing to offer until rescanned.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut wb = Self {
            dir,
            files: Vec::new(),
            selected: None,
            buffer: String::new(),
            dirty: false,
        };
        wb.rescan();
        wb
    }

    /// Re-lists the shader directory, sorted by file name for a stable menu.
    ///
    /// The current selection is kept when its path still exists, otherwise
    /// cleared along with the edit buffer.
    pub fn rescan(&mut self) {
        let previous = self.selected_path().map(Path::to_path_buf);

        self.files.clear();
        match std::fs::read_dir(&self.dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().is_some_and(|e| e == SHADER_EXT) {
                        self.files.push(path);
                    }
                }
                self.files.sort();
            }
            Err(e) => {
                warn!("cannot list shader directory {}: {e}", self.dir.display());
            }
        }

        if self.files.is_empty() {
            warn!("no .{SHADER_EXT} files in {}", self.dir.display());
        }

        self.selected = previous.and_then(|p| self.files.iter().position(|f| *f == p));
        if self.selected.is_none() {
            self.buffer.clear();
            self.dirty = false;
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// File names (without directory) for display.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.selected.and_then(|i| self.files.get(i)).map(PathBuf::as_path)
    }

    /// Loads the file at `index` into the edit buffer, discarding any
    /// unsaved edits to the previous selection.
    pub fn select(&mut self, index: usize) -> Result<()> {
        let path = self
            .files
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("no shader file at index {index}"))?;
        self.buffer = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read shader {}", path.display()))?;
        self.selected = Some(index);
        self.dirty = false;
        Ok(())
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Mutable access for the editor widget; call [`mark_dirty`](Self::mark_dirty)
    /// when the widget reports a change.
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// `true` while the buffer has edits not yet written to disk.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the buffer back to the selected file.
    pub fn save(&mut self) -> Result<&Path> {
        let path = self
            .selected
            .and_then(|i| self.files.get(i))
            .ok_or_else(|| anyhow::anyhow!("no shader file selected"))?;
        std::fs::write(path, &self.buffer)
            .with_context(|| format!("failed to write shader {}", path.display()))?;
        self.dirty = false;
        Ok(path)
    }
}

// ── tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "prism-workbench-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn scan_filters_by_extension_and_sorts() {
        let dir = scratch_dir("scan");
        std::fs::write(dir.join("b.wgsl"), "b").unwrap();
        std::fs::write(dir.join("a.wgsl"), "a").unwrap();
        std::fs::write(dir.join("notes.txt"), "x").unwrap();

        let wb = ShaderWorkbench::new(&dir);
        let names: Vec<&str> = wb.file_names().collect();
        assert_eq!(names, ["a.wgsl", "b.wgsl"]);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn select_loads_the_file_into_the_buffer() {
        let dir = scratch_dir("select");
        std::fs::write(dir.join("only.wgsl"), "contents").unwrap();

        let mut wb = ShaderWorkbench::new(&dir);
        wb.select(0).unwrap();
        assert_eq!(wb.buffer(), "contents");
        assert!(!wb.dirty());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn save_round_trips_the_edited_buffer() {
        let dir = scratch_dir("save");
        let path = dir.join("edit.wgsl");
        std::fs::write(&path, "before").unwrap();

        let mut wb = ShaderWorkbench::new(&dir);
        wb.select(0).unwrap();
        wb.buffer_mut().push_str("\nafter");
        wb.mark_dirty();
        assert!(wb.dirty());

        wb.save().unwrap();
        assert!(!wb.dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "before\nafter");

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn empty_directory_yields_no_files() {
        let dir = scratch_dir("empty");
        let wb = ShaderWorkbench::new(&dir);
        assert!(wb.files().is_empty());
        assert_eq!(wb.selected(), None);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn rescan_keeps_selection_while_the_file_exists() {
        let dir = scratch_dir("rescan");
        std::fs::write(dir.join("a.wgsl"), "a").unwrap();
        std::fs::write(dir.join("b.wgsl"), "b").unwrap();

        let mut wb = ShaderWorkbench::new(&dir);
        wb.select(1).unwrap();

        std::fs::write(dir.join("c.wgsl"), "c").unwrap();
        wb.rescan();
        assert_eq!(wb.selected_path().unwrap().file_name().unwrap(), "b.wgsl");

        std::fs::remove_dir_all(dir).unwrap();
    }
}
