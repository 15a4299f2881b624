//! Hunk-to-file transcription.
//!
//! Application runs two passes over a located hunk. Pass 1 walks the old
//! half: deletes remove target lines (or, under conditional wrapping, stay
//! behind as dead code inside a negative block). Pass 2 re-seeks to the
//! match and walks the new half, inserting payload text. A side array built
//! in pass 1 records, per context line, how many lines pass 1 left in the
//! target before it, so pass 2's cursor can step over them.

use crate::error::Result;
use crate::hunk::{Hunk, LineKind};
use crate::session::Session;
use crate::store::LineStore;

#[derive(PartialEq)]
enum Block {
    Closed,
    /// `#ifndef SYM` open (pass 1, deletes).
    Negative,
    /// `#else` open (pass 1, changes).
    Alternate,
    /// `#ifdef SYM` open (pass 2).
    Positive,
}

/// Apply `hunk` to `target` with its old half matched at line `at`,
/// updating the session drift for every line inserted or removed. With
/// `define` set, nothing is removed: old text survives inside
/// `#ifndef`/`#else` blocks and new text lands inside `#ifdef` blocks.
pub fn apply(
    target: &mut LineStore,
    hunk: &Hunk,
    at: usize,
    define: Option<&str>,
    session: &mut Session,
) -> Result<()> {
    // Pass 1: old half.
    let mut cursor = at;
    let mut skips: Vec<usize> = Vec::new();
    let mut pending = 0usize;
    let mut block = Block::Closed;
    for line in hunk.old_half() {
        match line.kind {
            LineKind::Context => {
                if block != Block::Closed {
                    target.insert(&end_marker(define), cursor)?;
                    cursor += 1;
                    pending += 1;
                    session.drift += 1;
                    block = Block::Closed;
                }
                skips.push(pending);
                pending = 0;
                cursor += 1;
            }
            LineKind::Delete | LineKind::Change => {
                let Some(sym) = define else {
                    target.delete(cursor);
                    session.drift -= 1;
                    continue;
                };
                match (&line.kind, &block) {
                    (LineKind::Delete, Block::Closed) => {
                        target.insert(&format!("#ifndef {sym}"), cursor)?;
                        cursor += 1;
                        pending += 1;
                        session.drift += 1;
                        block = Block::Negative;
                    }
                    (LineKind::Change, Block::Closed) | (LineKind::Change, Block::Negative) => {
                        target.insert("#else", cursor)?;
                        cursor += 1;
                        pending += 1;
                        session.drift += 1;
                        block = Block::Alternate;
                    }
                    _ => {}
                }
                // The old line stays behind as dead code.
                cursor += 1;
                pending += 1;
            }
            LineKind::Add => {}
        }
    }
    if block != Block::Closed {
        target.insert(&end_marker(define), cursor)?;
        session.drift += 1;
    }

    // Pass 2: new half.
    let mut cursor = at;
    let mut block = Block::Closed;
    let mut opened_by_add = false;
    let mut ctx = 0usize;
    for line in hunk.new_half() {
        match line.kind {
            LineKind::Context => {
                if block == Block::Positive {
                    if opened_by_add {
                        target.insert(&end_marker(define), cursor)?;
                        cursor += 1;
                        session.drift += 1;
                    }
                    block = Block::Closed;
                    opened_by_add = false;
                }
                cursor += skips.get(ctx).copied().unwrap_or(0) + 1;
                ctx += 1;
            }
            LineKind::Add | LineKind::Change => {
                if let Some(sym) = define
                    && block == Block::Closed
                {
                    target.insert(&format!("#ifdef {sym}"), cursor)?;
                    cursor += 1;
                    session.drift += 1;
                    block = Block::Positive;
                    opened_by_add = line.kind == LineKind::Add;
                }
                target.insert(&line.text, cursor)?;
                cursor += 1;
                session.drift += 1;
            }
            LineKind::Delete => {}
        }
    }
    if block == Block::Positive && opened_by_add {
        target.insert(&end_marker(define), cursor)?;
        session.drift += 1;
    }
    Ok(())
}

fn end_marker(define: Option<&str>) -> String {
    match define {
        Some(sym) => format!("#endif /* {sym} */"),
        None => "#endif".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::hunk::HunkLine;

    fn store_from(text: &str) -> LineStore {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(text.as_bytes()).unwrap();
        LineStore::open(Some(f.path())).unwrap()
    }

    fn contents(s: &mut LineStore) -> Vec<String> {
        (0..s.line_count())
            .map(|i| s.fetch(i).unwrap().unwrap().to_string())
            .collect()
    }

    fn hunk(old_start: usize, lines: &[(LineKind, &str)], old_len: usize) -> Hunk {
        let mut h = Hunk {
            old_start,
            new_start: old_start,
            ..Hunk::default()
        };
        for (kind, text) in lines {
            h.push(HunkLine::new(*kind, *text));
        }
        h.old_len = old_len;
        h
    }

    use LineKind::{Add, Change, Context, Delete};

    #[test]
    fn test_context_delete_add_nets_zero_drift() {
        let mut t = store_from("one\ntwo\nthree\nfour\nfive\n");
        let h = hunk(
            2,
            &[
                (Context, "two"),
                (Delete, "three"),
                (Context, "two"),
                (Add, "THREE"),
            ],
            2,
        );
        let mut session = Session::default();
        apply(&mut t, &h, 1, None, &mut session).unwrap();
        assert_eq!(contents(&mut t), ["one", "two", "THREE", "four", "five"]);
        assert_eq!(session.drift, 0);
    }

    #[test]
    fn test_pure_insert_updates_drift() {
        let mut t = store_from("a\nb\n");
        let h = hunk(2, &[(Add, "x"), (Add, "y")], 0);
        let mut session = Session::default();
        apply(&mut t, &h, 1, None, &mut session).unwrap();
        assert_eq!(contents(&mut t), ["a", "x", "y", "b"]);
        assert_eq!(session.drift, 2);
    }

    #[test]
    fn test_pure_delete_updates_drift() {
        let mut t = store_from("a\nb\nc\nd\n");
        let h = hunk(2, &[(Delete, "b"), (Delete, "c")], 2);
        let mut session = Session::default();
        apply(&mut t, &h, 1, None, &mut session).unwrap();
        assert_eq!(contents(&mut t), ["a", "d"]);
        assert_eq!(session.drift, -2);
    }

    #[test]
    fn test_change_with_trailing_context() {
        let mut t = store_from("head\nold1\nold2\ntail\n");
        let h = hunk(
            2,
            &[
                (Change, "old1"),
                (Change, "old2"),
                (Context, "tail"),
                (Change, "new1"),
                (Context, "tail"),
            ],
            3,
        );
        let mut session = Session::default();
        apply(&mut t, &h, 1, None, &mut session).unwrap();
        assert_eq!(contents(&mut t), ["head", "new1", "tail"]);
        assert_eq!(session.drift, -1);
    }

    #[test]
    fn test_define_wraps_change_in_if_else() {
        let mut t = store_from("keep\nold\nafter\n");
        let h = hunk(
            1,
            &[
                (Context, "keep"),
                (Change, "old"),
                (Context, "after"),
                (Context, "keep"),
                (Change, "new"),
                (Context, "after"),
            ],
            3,
        );
        let mut session = Session::default();
        apply(&mut t, &h, 0, Some("PATCHED"), &mut session).unwrap();
        assert_eq!(
            contents(&mut t),
            [
                "keep",
                "#ifdef PATCHED",
                "new",
                "#else",
                "old",
                "#endif /* PATCHED */",
                "after"
            ]
        );
        assert_eq!(session.drift, 4);
    }

    #[test]
    fn test_define_wraps_delete_in_ifndef() {
        let mut t = store_from("keep\ndoomed\nafter\n");
        let h = hunk(
            1,
            &[
                (Context, "keep"),
                (Delete, "doomed"),
                (Context, "after"),
                (Context, "keep"),
                (Context, "after"),
            ],
            3,
        );
        let mut session = Session::default();
        apply(&mut t, &h, 0, Some("SYM"), &mut session).unwrap();
        assert_eq!(
            contents(&mut t),
            ["keep", "#ifndef SYM", "doomed", "#endif /* SYM */", "after"]
        );
        assert_eq!(session.drift, 2);
    }

    #[test]
    fn test_define_wraps_trailing_add_in_ifdef() {
        let mut t = store_from("only\n");
        let h = hunk(
            1,
            &[(Context, "only"), (Context, "only"), (Add, "extra")],
            1,
        );
        let mut session = Session::default();
        apply(&mut t, &h, 0, Some("SYM"), &mut session).unwrap();
        assert_eq!(
            contents(&mut t),
            ["only", "#ifdef SYM", "extra", "#endif /* SYM */"]
        );
    }

    #[test]
    fn test_define_delete_and_add_get_separate_blocks() {
        let mut t = store_from("keep\nx\ntail\n");
        let h = hunk(
            1,
            &[
                (Context, "keep"),
                (Delete, "x"),
                (Context, "tail"),
                (Context, "keep"),
                (Add, "y"),
                (Context, "tail"),
            ],
            3,
        );
        let mut session = Session::default();
        apply(&mut t, &h, 0, Some("SYM"), &mut session).unwrap();
        assert_eq!(
            contents(&mut t),
            [
                "keep",
                "#ifdef SYM",
                "y",
                "#endif /* SYM */",
                "#ifndef SYM",
                "x",
                "#endif /* SYM */",
                "tail"
            ]
        );
    }

    #[test]
    fn test_round_trip_apply_then_swapped_inverse() {
        let before = "alpha\nbeta\ngamma\ndelta\n";
        let mut t = store_from(before);
        let mut h = hunk(
            2,
            &[
                (Context, "beta"),
                (Delete, "gamma"),
                (Context, "beta"),
                (Add, "GAMMA"),
                (Add, "GAMMA2"),
            ],
            2,
        );
        let mut session = Session::default();
        apply(&mut t, &h, 1, None, &mut session).unwrap();
        assert_eq!(session.drift, 1);
        h.swap();
        let mut session = Session::default();
        apply(&mut t, &h, 1, None, &mut session).unwrap();
        assert_eq!(
            contents(&mut t),
            ["alpha", "beta", "gamma", "delta"],
            "swapped inverse must restore the original"
        );
    }
}
