//! Reject rendering: hunks that could not be placed are written back out in
//! context-diff form so they can be inspected or reapplied by hand.

use crate::error::Result;
use crate::hunk::{Hunk, HunkLine, LineKind};
use crate::store::LineStore;

const SEPARATOR: &str = "***************";

/// Append `hunk` to the reject store, both halves under a reconstructed
/// context-style header. The caller syncs the store once per patch unit.
pub fn write_reject(store: &mut LineStore, hunk: &Hunk) -> Result<()> {
    append(store, SEPARATOR)?;
    let (a, b) = range(hunk.old_start, hunk.old_count());
    append(store, &format!("*** {a},{b} ****"))?;
    for line in hunk.old_half() {
        append(store, &render(line))?;
    }
    let (c, d) = range(hunk.new_start, hunk.new_count());
    append(store, &format!("--- {c},{d} ----"))?;
    for line in hunk.new_half() {
        append(store, &render(line))?;
    }
    Ok(())
}

fn append(store: &mut LineStore, text: &str) -> Result<()> {
    let end = store.line_count();
    store.insert(text, end)
}

/// An empty half renders as the empty range just before `start`.
fn range(start: usize, count: usize) -> (usize, usize) {
    if count == 0 {
        (start, start.saturating_sub(1))
    } else {
        (start, start + count - 1)
    }
}

fn render(line: &HunkLine) -> String {
    let tag = match line.kind {
        LineKind::Context => ' ',
        LineKind::Change => '!',
        LineKind::Delete => '-',
        LineKind::Add => '+',
    };
    format!("{tag} {}", line.text)
}
