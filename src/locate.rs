//! Fuzzy hunk placement: ring search around the drift-adjusted guess and the
//! reversed-patch heuristic.

use crate::error::Result;
use crate::hunk::Hunk;
use crate::session::Session;
use crate::store::LineStore;

/// Widest search ring tried around the guess before a hunk is given up on.
pub const MAX_FUZZ: i64 = 1000;

/// Outcome of placing one hunk against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Matched at this 0-based line index.
    Found(usize),
    /// Matched only after swapping the halves; the hunk is left swapped and
    /// the caller decides whether to accept the reversed orientation.
    FoundReversed(usize),
    NotFound,
}

/// Whitespace-insensitive line comparison: runs of whitespace collapse, but
/// they must start at the same non-whitespace boundaries on both sides, and
/// a run on one side with nothing on the other is a mismatch.
pub fn eq_loose(a: &str, b: &str) -> bool {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();
    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (Some(x), Some(y)) if x.is_whitespace() && y.is_whitespace() => {
                while ai.peek().is_some_and(|c| c.is_whitespace()) {
                    ai.next();
                }
                while bi.peek().is_some_and(|c| c.is_whitespace()) {
                    bi.next();
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return false;
                }
                ai.next();
                bi.next();
            }
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// Does the hunk's old half match the target starting at line `at`?
fn matches_at(target: &mut LineStore, hunk: &Hunk, at: usize, loose: bool) -> Result<bool> {
    for (i, line) in hunk.old_half().iter().enumerate() {
        let Some(have) = target.fetch(at + i)? else {
            return Ok(false);
        };
        let ok = if loose {
            eq_loose(have, &line.text)
        } else {
            have == line.text
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Try the ring at distance `fuzz` from `guess`: `guess - fuzz` first, then
/// `guess + fuzz`. A hunk with an empty old half matches at the clamped
/// guess unconditionally.
pub fn locate(
    target: &mut LineStore,
    hunk: &Hunk,
    guess: i64,
    fuzz: i64,
    loose: bool,
) -> Result<Option<usize>> {
    let count = target.line_count() as i64;
    if hunk.old_count() == 0 {
        // Pure insertion: the guess is an insertion point, which may sit one
        // past the last line.
        return Ok(Some(guess.clamp(0, count) as usize));
    }
    let max_at = count - hunk.old_count() as i64;
    let low = guess - fuzz;
    if (0..=max_at).contains(&low) && matches_at(target, hunk, low as usize, loose)? {
        return Ok(Some(low as usize));
    }
    if fuzz > 0 {
        let high = guess + fuzz;
        if (0..=max_at).contains(&high) && matches_at(target, hunk, high as usize, loose)? {
            return Ok(Some(high as usize));
        }
    }
    Ok(None)
}

/// Widen the ring until a match or until both ends have left the file.
fn search_out(
    target: &mut LineStore,
    hunk: &Hunk,
    guess: i64,
    loose: bool,
) -> Result<Option<usize>> {
    let max_at = target.line_count() as i64 - hunk.old_count() as i64;
    for fuzz in 0..=MAX_FUZZ {
        if let Some(at) = locate(target, hunk, guess, fuzz, loose)? {
            return Ok(Some(at));
        }
        if guess - fuzz < 0 && guess + fuzz > max_at {
            break;
        }
    }
    Ok(None)
}

/// Place a hunk, updating the session's last-match offset on success.
///
/// For the first hunk of a patch that fails outright (`swappable` rules out
/// forced runs and pure-deletion normal diffs, whose swap would be
/// indistinguishable from a match), the halves are tentatively swapped and
/// the search rerun. A reversed match leaves the hunk swapped; the caller
/// owns the confirmation decision and swaps back on decline.
pub fn check_location(
    target: &mut LineStore,
    hunk: &mut Hunk,
    swappable: bool,
    session: &mut Session,
    loose: bool,
) -> Result<Placement> {
    let base = hunk.old_start as i64 - 1 + session.drift;
    if let Some(at) = search_out(target, hunk, base + session.last_offset, loose)? {
        session.last_offset = at as i64 - base;
        return Ok(Placement::Found(at));
    }
    if swappable {
        hunk.swap();
        let base = hunk.old_start as i64 - 1 + session.drift;
        if let Some(at) = search_out(target, hunk, base + session.last_offset, loose)? {
            session.last_offset = at as i64 - base;
            return Ok(Placement::FoundReversed(at));
        }
        hunk.swap();
    }
    Ok(Placement::NotFound)
}
