//! Run-wide option settings and the per-target cursor state threaded through
//! the engine rather than kept in process globals.

use std::path::PathBuf;

use crate::parser::DiffFormat;

/// Options fixed for the whole run, produced by the CLI layer.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub format_override: Option<DiffFormat>,
    /// Target named on the command line, taking precedence over any name
    /// intuited from the listing.
    pub target_override: Option<PathBuf>,
    /// Leading path components to strip from listing file names; `None`
    /// keeps only the basename.
    pub strip: Option<usize>,
    pub reverse: bool,
    /// Collapse whitespace runs when matching context.
    pub loose_match: bool,
    /// Wrap changes in `#ifdef SYMBOL` conditionals instead of applying them
    /// destructively.
    pub define: Option<String>,
    /// Never ask questions; take the default answer everywhere.
    pub force: bool,
    pub silent: bool,
    pub output: Option<PathBuf>,
    pub reject_override: Option<PathBuf>,
}

/// Cursor state scoped to the target currently being patched. Reset per
/// patch unit.
#[derive(Debug, Default)]
pub struct Session {
    /// Net line-count change from hunks already applied to this target.
    pub drift: i64,
    /// Where the last hunk landed relative to its adjusted guess; seeds the
    /// next search.
    pub last_offset: i64,
    /// Effective orientation: the user's reverse flag, possibly flipped by
    /// the reversed-patch heuristic.
    pub reverse: bool,
    /// Once set, every remaining hunk in the unit goes straight to reject.
    pub reject_rest: bool,
}

impl Session {
    pub fn reset(&mut self, reverse: bool) {
        self.drift = 0;
        self.last_offset = 0;
        self.reverse = reverse;
        self.reject_rest = false;
    }
}
