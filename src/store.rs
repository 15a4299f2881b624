//! Virtualized per-file line table over an append-only scratch file.
//!
//! A [`LineStore`] keeps the text of every line in a scratch file and only a
//! small page window of it in memory, so large targets can be edited
//! line-by-line without loading them wholly. Descriptors stay in strict
//! logical order `0..count`; the scratch file is append-only, so bytes
//! referenced by a surviving descriptor are never overwritten or relocated.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{PatchError, Result};

const PAGE_SIZE: u64 = 4096;

#[derive(Debug, Clone, Copy)]
struct LineSpan {
    offset: u64,
    len: u32,
}

/// Where [`LineStore::sync`] writes the live lines.
#[derive(Debug, Clone, Copy)]
pub enum SyncDest<'a> {
    /// Back to the path the store was opened from.
    InPlace,
    Path(&'a Path),
    Stdout,
}

pub struct LineStore {
    name: Option<PathBuf>,
    scratch: File,
    scratch_len: u64,
    spans: Vec<LineSpan>,
    window: Vec<u8>,
    window_start: u64,
    final_newline: bool,
}

impl LineStore {
    /// Open `path` and load its lines; `None` reads standard input. A path
    /// that does not exist yet starts out empty.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let mut raw = Vec::new();
        let name = match path {
            Some(p) => {
                match File::open(p) {
                    Ok(mut f) => {
                        f.read_to_end(&mut raw)
                            .map_err(|e| PatchError::io(format!("reading {}", p.display()), e))?;
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(PatchError::io(format!("opening {}", p.display()), e)),
                }
                Some(p.to_path_buf())
            }
            None => {
                io::stdin()
                    .read_to_end(&mut raw)
                    .map_err(|e| PatchError::io("reading standard input", e))?;
                None
            }
        };
        let mut store = Self::with_name(name)?;
        store.load_bytes(&raw)?;
        Ok(store)
    }

    /// An empty store with no backing path (reject output, tests).
    pub fn create() -> Result<Self> {
        Self::with_name(None)
    }

    fn with_name(name: Option<PathBuf>) -> Result<Self> {
        let scratch =
            tempfile::tempfile().map_err(|e| PatchError::io("creating scratch file", e))?;
        Ok(LineStore {
            name,
            scratch,
            scratch_len: 0,
            spans: Vec::new(),
            window: Vec::new(),
            window_start: 0,
            final_newline: true,
        })
    }

    fn load_bytes(&mut self, raw: &[u8]) -> Result<()> {
        self.spans.clear();
        self.window.clear();
        self.window_start = 0;
        self.final_newline = raw.is_empty() || raw.ends_with(b"\n");
        for chunk in raw.split_inclusive(|&b| b == b'\n') {
            let line = chunk.strip_suffix(b"\n").unwrap_or(chunk);
            let text = String::from_utf8_lossy(line);
            let span = self.append_bytes(&text)?;
            self.spans.push(span);
        }
        Ok(())
    }

    fn append_bytes(&mut self, text: &str) -> Result<LineSpan> {
        self.scratch
            .seek(SeekFrom::Start(self.scratch_len))
            .and_then(|_| self.scratch.write_all(text.as_bytes()))
            .map_err(|e| PatchError::io("writing scratch file", e))?;
        let span = LineSpan {
            offset: self.scratch_len,
            len: text.len() as u32,
        };
        self.scratch_len += text.len() as u64;
        Ok(span)
    }

    pub fn name(&self) -> Option<&Path> {
        self.name.as_deref()
    }

    pub fn line_count(&self) -> usize {
        self.spans.len()
    }

    /// A read-only view of line `n` through the page window, remapping the
    /// minimal covering page run when the line falls outside it. Out of
    /// range is `None`; scratch-file faults propagate.
    pub fn fetch(&mut self, n: usize) -> Result<Option<&str>> {
        let Some(&span) = self.spans.get(n) else {
            return Ok(None);
        };
        if !self.window_covers(span) {
            self.remap(span)?;
        }
        let start = (span.offset - self.window_start) as usize;
        let bytes = &self.window[start..start + span.len as usize];
        Ok(std::str::from_utf8(bytes).ok())
    }

    fn window_covers(&self, span: LineSpan) -> bool {
        span.offset >= self.window_start
            && span.offset + span.len as u64 <= self.window_start + self.window.len() as u64
    }

    fn remap(&mut self, span: LineSpan) -> Result<()> {
        let first = span.offset / PAGE_SIZE * PAGE_SIZE;
        let end = span.offset + span.len as u64;
        let last = end.div_ceil(PAGE_SIZE) * PAGE_SIZE;
        let stop = last.min(self.scratch_len);
        let mut buf = vec![0u8; (stop - first) as usize];
        self.scratch
            .seek(SeekFrom::Start(first))
            .and_then(|_| self.scratch.read_exact(&mut buf))
            .map_err(|e| PatchError::io("reading scratch file", e))?;
        self.window = buf;
        self.window_start = first;
        Ok(())
    }

    /// Splice `text` in as line `at`, padding with empty lines when `at`
    /// exceeds the current count.
    pub fn insert(&mut self, text: &str, at: usize) -> Result<()> {
        while self.spans.len() < at {
            let pad = self.append_bytes("")?;
            self.spans.push(pad);
        }
        let span = self.append_bytes(text)?;
        self.spans.insert(at, span);
        Ok(())
    }

    /// Drop line `n`, shifting later lines down. The bytes stay in the
    /// scratch file, unreferenced.
    pub fn delete(&mut self, n: usize) {
        if n < self.spans.len() {
            self.spans.remove(n);
        }
    }

    /// Shave `bytes` off the front of every line descriptor. Used to strip a
    /// common indentation prefix that every line is known to carry.
    pub fn strip_indent(&mut self, bytes: usize) {
        for span in &mut self.spans {
            let cut = (span.len as usize).min(bytes) as u32;
            span.offset += cut as u64;
            span.len -= cut;
        }
    }

    /// Write all live lines in order to `dest`. Named output created fresh
    /// inherits the permission bits of the original file when there was one.
    pub fn sync(&mut self, dest: SyncDest<'_>) -> Result<()> {
        match dest {
            SyncDest::Stdout => {
                let stdout = io::stdout();
                let mut w = BufWriter::new(stdout.lock());
                self.write_lines(&mut w)?;
                w.flush()
                    .map_err(|e| PatchError::io("writing standard output", e))
            }
            SyncDest::InPlace => {
                let path = self
                    .name
                    .clone()
                    .ok_or_else(|| PatchError::aborted("no file name to write back to"))?;
                self.write_named(&path)
            }
            SyncDest::Path(path) => self.write_named(path),
        }
    }

    fn write_named(&mut self, path: &Path) -> Result<()> {
        let perms = self
            .name
            .as_ref()
            .filter(|orig| orig.as_path() != path)
            .and_then(|orig| fs::metadata(orig).ok())
            .map(|m| m.permissions());
        let file = File::create(path)
            .map_err(|e| PatchError::io(format!("creating {}", path.display()), e))?;
        let mut w = BufWriter::new(file);
        self.write_lines(&mut w)?;
        w.flush()
            .map_err(|e| PatchError::io(format!("writing {}", path.display()), e))?;
        if let Some(perms) = perms {
            let _ = fs::set_permissions(path, perms);
        }
        Ok(())
    }

    fn write_lines<W: Write>(&mut self, w: &mut W) -> Result<()> {
        let count = self.spans.len();
        for i in 0..count {
            let line = match self.fetch(i)? {
                Some(text) => text,
                None => "",
            };
            w.write_all(line.as_bytes())
                .map_err(|e| PatchError::io("writing output", e))?;
            if i + 1 < count || self.final_newline {
                w.write_all(b"\n")
                    .map_err(|e| PatchError::io("writing output", e))?;
            }
        }
        Ok(())
    }

    /// Throw away the current line table and reload it from `path`. Used
    /// after an external line editor has rewritten the file.
    pub fn reload_from(&mut self, path: &Path) -> Result<()> {
        let mut raw = Vec::new();
        File::open(path)
            .and_then(|mut f| f.read_to_end(&mut raw))
            .map_err(|e| PatchError::io(format!("reloading {}", path.display()), e))?;
        self.load_bytes(&raw)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn store_from(text: &str) -> LineStore {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(text.as_bytes()).unwrap();
        LineStore::open(Some(f.path())).unwrap()
    }

    #[test]
    fn test_open_splits_lines() {
        let mut s = store_from("alpha\nbeta\ngamma\n");
        assert_eq!(s.line_count(), 3);
        assert_eq!(s.fetch(0).unwrap(), Some("alpha"));
        assert_eq!(s.fetch(2).unwrap(), Some("gamma"));
        assert_eq!(s.fetch(3).unwrap(), None);
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = LineStore::open(Some(&dir.path().join("nope.txt"))).unwrap();
        assert_eq!(s.line_count(), 0);
        assert_eq!(s.fetch(0).unwrap(), None);
    }

    #[test]
    fn test_insert_and_delete_keep_table_integrity() {
        let mut s = store_from("a\nb\nc\n");
        s.insert("x", 1).unwrap();
        s.delete(3);
        s.insert("y", 0).unwrap();
        // y a x b
        let want = ["y", "a", "x", "b"];
        for (i, w) in want.iter().enumerate() {
            assert_eq!(s.fetch(i).unwrap(), Some(*w));
        }
        assert_eq!(s.fetch(want.len()).unwrap(), None);
    }

    #[test]
    fn test_insert_past_end_pads_with_empty_lines() {
        let mut s = LineStore::create().unwrap();
        s.insert("tail", 3).unwrap();
        assert_eq!(s.line_count(), 4);
        assert_eq!(s.fetch(0).unwrap(), Some(""));
        assert_eq!(s.fetch(2).unwrap(), Some(""));
        assert_eq!(s.fetch(3).unwrap(), Some("tail"));
    }

    #[test]
    fn test_fetch_remaps_window_across_pages() {
        let long = "x".repeat(3000);
        let text = format!("{long}\n{long}\n{long}\nlast\n");
        let mut s = store_from(&text);
        assert_eq!(s.fetch(3).unwrap(), Some("last"));
        assert_eq!(s.fetch(0).unwrap().map(|l| l.len()), Some(3000));
        assert_eq!(s.fetch(3).unwrap(), Some("last"));
    }

    #[test]
    fn test_sync_round_trips_contents() {
        let mut s = store_from("one\ntwo\n");
        s.insert("between", 1).unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();
        s.sync(SyncDest::Path(out.path())).unwrap();
        let written = std::fs::read_to_string(out.path()).unwrap();
        assert_eq!(written, "one\nbetween\ntwo\n");
    }

    #[test]
    fn test_sync_preserves_missing_final_newline() {
        let mut s = store_from("one\ntwo");
        let out = tempfile::NamedTempFile::new().unwrap();
        s.sync(SyncDest::Path(out.path())).unwrap();
        assert_eq!(std::fs::read_to_string(out.path()).unwrap(), "one\ntwo");
    }

    #[test]
    fn test_reload_from_replaces_table() {
        let mut s = store_from("old\n");
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"new one\nnew two\n").unwrap();
        s.reload_from(f.path()).unwrap();
        assert_eq!(s.line_count(), 2);
        assert_eq!(s.fetch(0).unwrap(), Some("new one"));
        assert_eq!(s.fetch(1).unwrap(), Some("new two"));
    }

    #[test]
    fn test_strip_indent_trims_every_line() {
        let mut s = store_from("    a\n    b\n");
        s.strip_indent(4);
        assert_eq!(s.fetch(0).unwrap(), Some("a"));
        assert_eq!(s.fetch(1).unwrap(), Some("b"));
    }
}
