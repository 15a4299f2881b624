//! In-memory unit of change: role-tagged lines split into an old half and a
//! new half, as read from one hunk of a diff listing.

/// Role of one hunk line. Old halves hold context/delete/change lines, new
/// halves context/add/change lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Delete,
    Add,
    Change,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HunkLine {
    pub kind: LineKind,
    pub text: String,
}

impl HunkLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        HunkLine {
            kind,
            text: text.into(),
        }
    }
}

/// One contiguous change unit. `lines` holds the old half followed by the
/// new half; `old_len` marks the boundary. After parsing, each half's length
/// is the hunk's line count for that side of the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hunk {
    /// 1-based first line in the old file (0 for prepend-to-empty hunks).
    pub old_start: usize,
    /// 1-based first line in the new file.
    pub new_start: usize,
    pub lines: Vec<HunkLine>,
    pub old_len: usize,
}

impl Hunk {
    pub fn old_half(&self) -> &[HunkLine] {
        &self.lines[..self.old_len]
    }

    pub fn new_half(&self) -> &[HunkLine] {
        &self.lines[self.old_len..]
    }

    pub fn old_count(&self) -> usize {
        self.old_len
    }

    pub fn new_count(&self) -> usize {
        self.lines.len() - self.old_len
    }

    pub fn push(&mut self, line: HunkLine) {
        self.lines.push(line);
    }

    /// Mark everything pushed so far as the old half.
    pub fn seal_old_half(&mut self) {
        self.old_len = self.lines.len();
    }

    /// Exchange the halves in place, relabeling delete as add and add as
    /// delete, for reverse application.
    pub fn swap(&mut self) {
        let mut old: Vec<HunkLine> = self.lines.drain(..self.old_len).collect();
        let mut new: Vec<HunkLine> = std::mem::take(&mut self.lines);
        for line in &mut new {
            if line.kind == LineKind::Add {
                line.kind = LineKind::Delete;
            }
        }
        for line in &mut old {
            if line.kind == LineKind::Delete {
                line.kind = LineKind::Add;
            }
        }
        std::mem::swap(&mut self.old_start, &mut self.new_start);
        self.old_len = new.len();
        self.lines = new;
        self.lines.extend(old);
    }
}
