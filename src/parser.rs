//! Diff-listing reader: indentation stripping, format auto-detection, and
//! the per-format hunk parsers.
//!
//! The reader owns the listing in a [`LineStore`] and two cursors: `base`,
//! where the next scan resumes, and `input_line`, the line currently being
//! consumed. Malformed input aborts the whole run; there is no hunk-level
//! recovery.

use std::path::Path;

use crate::error::{PatchError, Result};
use crate::hunk::{Hunk, HunkLine, LineKind};
use crate::names::{fetchname, header_token};
use crate::session::Settings;
use crate::store::LineStore;

/// Which diff grammar the current patch unit is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffFormat {
    Context,
    NewContext,
    Normal,
    Unified,
    Ed,
    ModifiedEd,
}

impl DiffFormat {
    pub fn describe(self, another: bool) -> &'static str {
        match (self, another) {
            (DiffFormat::Context, false) => "Looks like a context diff to me...",
            (DiffFormat::Context, true) => "The next patch looks like a context diff.",
            (DiffFormat::NewContext, false) => "Looks like a new-style context diff.",
            (DiffFormat::NewContext, true) => "The next patch looks like a new-style context diff.",
            (DiffFormat::Normal, false) => "Looks like a normal diff.",
            (DiffFormat::Normal, true) => "The next patch looks like a normal diff.",
            (DiffFormat::Unified, false) => "Looks like a unified context diff.",
            (DiffFormat::Unified, true) => "The next patch looks like a unified context diff.",
            (DiffFormat::Ed, false) => "Looks like an ed script.",
            (DiffFormat::Ed, true) => "The next patch looks like an ed script.",
            (DiffFormat::ModifiedEd, false) => "Looks like a modified ed diff.",
            (DiffFormat::ModifiedEd, true) => "The next patch looks like a modified ed diff.",
        }
    }
}

pub struct PatchReader {
    listing: LineStore,
    /// Where the next header scan or hunk read resumes.
    base: usize,
    /// Line currently being consumed; 1-based in error messages.
    input_line: usize,
    format: Option<DiffFormat>,
    intuited_name: Option<String>,
}

impl PatchReader {
    /// Load the listing (`None` reads standard input) and strip the common
    /// leading-indentation prefix shared by every line.
    pub fn open(path: Option<&Path>, silent: bool) -> Result<Self> {
        let mut listing = LineStore::open(path)?;
        let indent = common_indent(&mut listing)?;
        if !indent.is_empty() {
            let cols = indent.chars().count();
            listing.strip_indent(indent.len());
            if !silent {
                if cols == 1 {
                    eprintln!("(Patch is indented 1 space.)");
                } else {
                    eprintln!("(Patch is indented {cols} spaces.)");
                }
            }
        }
        Ok(PatchReader {
            listing,
            base: 0,
            input_line: 0,
            format: None,
            intuited_name: None,
        })
    }

    pub fn format(&self) -> Option<DiffFormat> {
        self.format
    }

    fn fetch_owned(&mut self, n: usize) -> Result<Option<String>> {
        Ok(self.listing.fetch(n)?.map(str::to_string))
    }

    /// Scan forward for the next patch unit, intuiting its format and a
    /// candidate target name. A format override still lets the scan run to
    /// reposition the cursor (for the formats whose headers it can find),
    /// except that an old-style context override accepts a detected
    /// new-style one.
    pub fn next_patch_header(
        &mut self,
        settings: &Settings,
    ) -> Result<Option<(DiffFormat, Option<String>)>> {
        self.intuited_name = None;
        let another = self.base != 0;
        if another && self.base >= self.listing.line_count() {
            return Ok(None);
        }
        let format = match settings.format_override {
            None => match self.intuit(settings)? {
                Some(f) => f,
                None => {
                    if another {
                        if !settings.silent {
                            eprintln!("  Ignoring the trailing garbage.");
                        }
                        return Ok(None);
                    }
                    return Err(PatchError::aborted(
                        "could not find a patch in the listing anywhere",
                    ));
                }
            },
            Some(ov) if matches!(ov, DiffFormat::Context | DiffFormat::Unified) => {
                let detected = self.intuit(settings)?;
                if detected.is_none() && another {
                    return Ok(None);
                }
                if ov == DiffFormat::Context && detected == Some(DiffFormat::NewContext) {
                    DiffFormat::NewContext
                } else {
                    ov
                }
            }
            Some(ov) => ov,
        };
        self.format = Some(format);
        if !settings.silent {
            eprintln!("  {}", format.describe(another));
        }
        Ok(Some((format, self.intuited_name.take())))
    }

    /// Determine what kind of diff starts the remaining listing, leaving
    /// `base` at the first hunk and capturing header file names as fallback
    /// target names.
    fn intuit(&mut self, settings: &Settings) -> Result<Option<DiffFormat>> {
        let mut stars_last_line = false;
        let mut index_file: Option<String> = None;
        let mut star_file: Option<String> = None;
        let mut minus_file: Option<String> = None;
        let mut result = None;
        let mut i = self.base;
        loop {
            let Some(line) = self.fetch_owned(i)? else { break };
            let digit_led = line.chars().next().is_some_and(|c| c.is_ascii_digit());
            let rest = line.trim_start_matches(|c: char| c.is_ascii_digit() || c == ',');
            if digit_led {
                let op = rest.chars().next();
                if matches!(op, Some('d') | Some('c') | Some('a')) {
                    result = Some(if rest.len() == 1 {
                        DiffFormat::Ed
                    } else {
                        DiffFormat::Normal
                    });
                    self.base = i;
                    break;
                }
                if matches!(op, Some('i') | Some('s')) {
                    result = Some(DiffFormat::Ed);
                    self.base = i;
                    break;
                }
            }
            if !stars_last_line && line.starts_with("*** ") {
                star_file = fetchname(header_token(&line[4..]), settings.strip);
            } else if line.starts_with("--- ") {
                minus_file = fetchname(header_token(&line[4..]), settings.strip);
            } else if line.starts_with("+++ ") {
                star_file = minus_file.take();
                minus_file = fetchname(header_token(&line[4..]), settings.strip);
                result = Some(DiffFormat::Unified);
                self.base = i + 1;
                break;
            } else if line.starts_with("Index:") {
                index_file = fetchname(header_token(&line[6..]), settings.strip);
            } else if stars_last_line && line.starts_with("*** ") {
                // A new-style context header ends in a star.
                result = Some(if line.ends_with('*') {
                    DiffFormat::NewContext
                } else {
                    DiffFormat::Context
                });
                self.base = i;
                break;
            }
            stars_last_line = line.starts_with("********");
            i += 1;
        }
        // With both header names present the Index name wins; failing that,
        // prefer whichever header name already exists on disk. `/dev/null`
        // marks a created or deleted file, never a target name.
        self.intuited_name = if star_file.is_some() && minus_file.is_some() {
            index_file.or_else(|| {
                let star_real = star_file.as_deref().is_some_and(|n| n != "/dev/null");
                let minus_real = minus_file.as_deref().is_some_and(|n| n != "/dev/null");
                let star_exists = star_file.as_deref().is_some_and(|n| Path::new(n).exists());
                if star_real && (star_exists || !minus_real) {
                    star_file
                } else if minus_real {
                    minus_file
                } else {
                    None
                }
            })
        } else if star_file.is_some() {
            star_file
        } else if minus_file.is_some() {
            minus_file
        } else {
            index_file
        };
        Ok(result)
    }

    /// Read the next hunk of the current patch unit, or `None` when the unit
    /// is exhausted.
    pub fn next_hunk(&mut self) -> Result<Option<Hunk>> {
        match self.format {
            Some(DiffFormat::Context) => self.context_hunk(false),
            Some(DiffFormat::NewContext) => self.context_hunk(true),
            Some(DiffFormat::Normal) => self.normal_hunk(),
            Some(DiffFormat::Unified) => self.unified_hunk(),
            _ => Err(PatchError::aborted("unrecognized diff type")),
        }
    }

    /// Context-diff hunk reader, shared by the old and new styles:
    ///
    /// ```text
    /// *** oldstart,oldend [****]
    ///   unaffected        - deleted        ! changed
    /// --- newstart,newend [----]
    ///   unaffected        + added          ! changed
    /// ```
    fn context_hunk(&mut self, new_style: bool) -> Result<Option<Hunk>> {
        self.input_line = self.base;
        let mut hunk = Hunk::default();
        let mut replace_count: i64 = 0;
        let mut in_replace = false;
        // If neither '!' nor '+' appears in the old half, the new half may
        // be omitted entirely.
        let mut repl_could_be_missing = true;

        // Anything other than a hunk header of the same persuasion ends the
        // unit; separators were already consumed by the previous hunk, but a
        // stray one is tolerated here.
        let header = loop {
            let Some(line) = self.fetch_owned(self.input_line)? else {
                self.base = self.input_line;
                return Ok(None);
            };
            self.input_line += 1;
            if line.starts_with("********") {
                continue;
            }
            if line.starts_with("*** ") && line.ends_with('*') == new_style {
                break line;
            }
            self.base = self.input_line - 1;
            return Ok(None);
        };
        let (old_start, _) = self.context_range(&header[4..])?;
        hunk.old_start = old_start;

        // Old half, up to the `--- newstart,newend` line.
        let second_header = loop {
            let Some(line) = self.fetch_owned(self.input_line)? else {
                return Err(PatchError::malformed(
                    self.input_line + 1,
                    "premature end of file",
                ));
            };
            self.input_line += 1;
            if line.starts_with("--- ") {
                break line;
            }
            if line.is_empty() {
                if new_style {
                    hunk.push(HunkLine::new(LineKind::Context, ""));
                }
                continue;
            }
            let tag = line.chars().next().unwrap_or(' ');
            match tag {
                '-' | ' ' => {
                    in_replace = false;
                    self.require_tag_space(&line)?;
                    let kind = if tag == '-' {
                        LineKind::Delete
                    } else {
                        LineKind::Context
                    };
                    hunk.push(HunkLine::new(kind, payload(&line)));
                }
                '!' => {
                    repl_could_be_missing = false;
                    if !in_replace {
                        in_replace = true;
                        replace_count += 1;
                    }
                    self.require_tag_space(&line)?;
                    hunk.push(HunkLine::new(LineKind::Change, payload(&line)));
                }
                '+' => {
                    return Err(PatchError::malformed(
                        self.input_line,
                        "old-file lines cannot contain inserted lines",
                    ));
                }
                '*' => {
                    if line.starts_with("********") {
                        return Err(PatchError::malformed(
                            self.input_line,
                            "new hunk detected before new-file lines were found",
                        ));
                    }
                    return Err(PatchError::malformed(
                        self.input_line,
                        "unexpected '***' in old-file lines",
                    ));
                }
                _ => {
                    return Err(PatchError::malformed(
                        self.input_line,
                        "old-file lines must begin with '- ', '  ', or '! '",
                    ));
                }
            }
        };
        hunk.seal_old_half();

        let (new_start, declared_new) = self.context_range(&second_header[4..])?;
        hunk.new_start = new_start;

        // An empty old half recovers its context from the space-tagged
        // subset of the new half, which is then re-read as the new half
        // proper.
        if hunk.lines.is_empty() {
            let save = self.input_line;
            let mut eline = 0usize;
            loop {
                let Some(line) = self.fetch_owned(self.input_line)? else {
                    break;
                };
                self.input_line += 1;
                if line.starts_with("********") || line.starts_with("Index:") {
                    break;
                }
                if eline >= declared_new {
                    break;
                }
                if line.starts_with(' ') {
                    self.require_tag_space(&line)?;
                    hunk.push(HunkLine::new(LineKind::Context, payload(&line)));
                }
                eline += 1;
            }
            self.input_line = save;
            hunk.seal_old_half();
        }

        // New half, bounded by the declared count, the next hunk separator,
        // or the next unit.
        in_replace = false;
        let mut count = 0usize;
        loop {
            let Some(line) = self.fetch_owned(self.input_line)? else {
                break;
            };
            self.input_line += 1;
            if !new_style && line.is_empty() {
                continue;
            }
            if line.starts_with("********") {
                break;
            }
            if line.starts_with("Index:") || line.starts_with("*** ") {
                self.input_line -= 1;
                break;
            }
            if count >= declared_new {
                self.input_line -= 1;
                break;
            }
            let tag = line.chars().next().unwrap_or('\n');
            match tag {
                ' ' | '+' => {
                    in_replace = false;
                    self.require_tag_space(&line)?;
                    let kind = if tag == '+' {
                        LineKind::Add
                    } else {
                        LineKind::Context
                    };
                    hunk.push(HunkLine::new(kind, payload(&line)));
                }
                '!' => {
                    if !in_replace {
                        in_replace = true;
                        replace_count -= 1;
                    }
                    self.require_tag_space(&line)?;
                    hunk.push(HunkLine::new(LineKind::Change, payload(&line)));
                }
                _ => {
                    if count == 0 && repl_could_be_missing {
                        self.input_line -= 1;
                        break;
                    }
                    return Err(PatchError::malformed(
                        self.input_line,
                        "new-file lines must begin with '+ ', '  ', or '! '",
                    ));
                }
            }
            count += 1;
        }
        self.base = self.input_line;
        if replace_count != 0 {
            return Err(PatchError::malformed(
                self.input_line,
                "premature end of hunk (unbalanced change lines)",
            ));
        }
        // Omitted new half: the old half's context lines double as it.
        if count == 0 {
            let ctx: Vec<HunkLine> = hunk
                .old_half()
                .iter()
                .filter(|l| l.kind == LineKind::Context)
                .cloned()
                .collect();
            for l in ctx {
                hunk.push(l);
            }
        }
        repair_context(&mut hunk);
        Ok(Some(hunk))
    }

    /// Normal-diff hunk reader: `N[,N]{a,c,d}N[,N]` followed by `< ` old
    /// lines, a `---` separator for changes, and `> ` new lines.
    fn normal_hunk(&mut self) -> Result<Option<Hunk>> {
        self.input_line = self.base;
        let mut hunk = Hunk::default();
        // The unit ends at the first line that is not a hunk command.
        let cmd = {
            let Some(line) = self.fetch_owned(self.input_line)? else {
                self.base = self.input_line;
                return Ok(None);
            };
            if !line.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                self.base = self.input_line;
                return Ok(None);
            }
            self.input_line += 1;
            line
        };
        let lineno = self.input_line;
        let (n, mut rest) = lead_number(&cmd);
        let mut old_start =
            n.ok_or_else(|| PatchError::malformed(lineno, "bad hunk command line"))?;
        let mut old_count = 1usize;
        if let Some(r) = rest.strip_prefix(',') {
            let (n2, r2) = lead_number(r);
            let end = n2
                .ok_or_else(|| PatchError::malformed(lineno, "no digits were found following ','"))?;
            old_count = end
                .checked_sub(old_start)
                .map(|d| d + 1)
                .ok_or_else(|| PatchError::malformed(lineno, "hunk range ends before it starts"))?;
            rest = r2;
        }
        let op = rest.chars().next();
        let (n3, rest2) = lead_number(rest.get(1..).unwrap_or(""));
        let mut new_start =
            n3.ok_or_else(|| PatchError::malformed(lineno, "bad hunk command line"))?;
        let mut new_count = 1usize;
        if let Some(r) = rest2.strip_prefix(',') {
            let (n4, _) = lead_number(r);
            let end = n4
                .ok_or_else(|| PatchError::malformed(lineno, "no digits were found following ','"))?;
            new_count = end
                .checked_sub(new_start)
                .map(|d| d + 1)
                .ok_or_else(|| PatchError::malformed(lineno, "hunk range ends before it starts"))?;
        }
        match op {
            Some('a') => {
                hunk.seal_old_half();
                for _ in 0..new_count {
                    let line = self.expect_tagged('>')?;
                    hunk.push(HunkLine::new(LineKind::Add, line));
                }
                old_start += 1;
            }
            Some('d') => {
                for _ in 0..old_count {
                    let line = self.expect_tagged('<')?;
                    hunk.push(HunkLine::new(LineKind::Delete, line));
                }
                hunk.seal_old_half();
                new_start += 1;
            }
            Some('c') => {
                for _ in 0..old_count {
                    let line = self.expect_tagged('<')?;
                    hunk.push(HunkLine::new(LineKind::Change, line));
                }
                hunk.seal_old_half();
                let sep = self.expect_line()?;
                if sep != "---" {
                    return Err(PatchError::malformed(self.input_line, "'---' expected"));
                }
                for _ in 0..new_count {
                    let line = self.expect_tagged('>')?;
                    hunk.push(HunkLine::new(LineKind::Change, line));
                }
            }
            _ => {
                return Err(PatchError::malformed(lineno, "unknown diff operator"));
            }
        }
        hunk.old_start = old_start;
        hunk.new_start = new_start;
        self.base = self.input_line;
        Ok(Some(hunk))
    }

    /// Unified-diff hunk reader: `@@ -old[,count] +new[,count] @@` followed
    /// by one interleaved stream read in two passes. Context and delete
    /// lines feed the old half, context and add lines the new half.
    fn unified_hunk(&mut self) -> Result<Option<Hunk>> {
        self.input_line = self.base;
        let mut hunk = Hunk::default();
        // The unit ends at the first line that is not a hunk header. Any
        // text after the closing `@@` (a section heading) is ignored.
        let header = {
            let Some(line) = self.fetch_owned(self.input_line)? else {
                self.base = self.input_line;
                return Ok(None);
            };
            if !line.starts_with("@@ ") {
                self.base = self.input_line;
                return Ok(None);
            }
            self.input_line += 1;
            line
        };
        let lineno = self.input_line;
        let (old_start, old_count, after) = unified_range(&header[3..], lineno)?;
        let (new_start, new_count, _) = unified_range(after, lineno)?;
        // A zero-count range names the line before the change.
        hunk.old_start = if old_count == 0 { old_start + 1 } else { old_start };
        hunk.new_start = if new_count == 0 { new_start + 1 } else { new_start };

        let body_start = self.input_line;
        let mut got = 0usize;
        while got < old_count {
            let Some(line) = self.fetch_owned(self.input_line)? else {
                break;
            };
            match line.chars().next() {
                // "\ No newline at end of file" annotations carry no text.
                Some('+') | Some('\\') => {
                    self.input_line += 1;
                }
                Some('-') => {
                    self.input_line += 1;
                    hunk.push(HunkLine::new(LineKind::Delete, tail(&line)));
                    got += 1;
                }
                Some(' ') => {
                    self.input_line += 1;
                    hunk.push(HunkLine::new(LineKind::Context, tail(&line)));
                    got += 1;
                }
                _ => break,
            }
        }
        let end_old = self.input_line;
        hunk.seal_old_half();

        self.input_line = body_start;
        let mut got = 0usize;
        while got < new_count {
            let Some(line) = self.fetch_owned(self.input_line)? else {
                break;
            };
            match line.chars().next() {
                Some('-') | Some('\\') => {
                    self.input_line += 1;
                }
                Some('+') => {
                    self.input_line += 1;
                    hunk.push(HunkLine::new(LineKind::Add, tail(&line)));
                    got += 1;
                }
                Some(' ') => {
                    self.input_line += 1;
                    hunk.push(HunkLine::new(LineKind::Context, tail(&line)));
                    got += 1;
                }
                _ => break,
            }
        }
        self.base = self.input_line.max(end_old);
        Ok(Some(hunk))
    }

    /// Pull the ed commands of the current unit off the listing, including
    /// the bodies of `a`/`c`/`i` commands up to their lone-dot terminators.
    pub fn next_ed_commands(&mut self) -> Result<Vec<String>> {
        let mut script = Vec::new();
        loop {
            let Some(line) = self.fetch_owned(self.base)? else {
                break;
            };
            if line.starts_with("Index:") || line.starts_with("***") {
                break;
            }
            let digit_led = line.chars().next().is_some_and(|c| c.is_ascii_digit());
            let rest = line.trim_start_matches(|c: char| c.is_ascii_digit() || c == ',');
            let op = rest.chars().next();
            if digit_led && matches!(op, Some('d') | Some('s')) {
                self.base += 1;
                script.push(line);
            } else if matches!(op, Some('c') | Some('a') | Some('i')) {
                self.base += 1;
                script.push(line);
                loop {
                    let Some(body) = self.fetch_owned(self.base)? else {
                        break;
                    };
                    self.base += 1;
                    let done = body == ".";
                    script.push(body);
                    if done {
                        break;
                    }
                }
            } else {
                break;
            }
        }
        Ok(script)
    }

    /// Parse `start[,end]` with an inclusive end, as context headers use.
    fn context_range(&self, s: &str) -> Result<(usize, usize)> {
        let lineno = self.input_line;
        let pos = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| PatchError::malformed(lineno, "no line range found in hunk header"))?;
        let (n, rest) = lead_number(&s[pos..]);
        let start =
            n.ok_or_else(|| PatchError::malformed(lineno, "no line range found in hunk header"))?;
        let count = if let Some(after) = rest.strip_prefix(',') {
            let pos2 = after.find(|c: char| c.is_ascii_digit()).ok_or_else(|| {
                PatchError::malformed(lineno, "no digits were found following ','")
            })?;
            let (end, _) = lead_number(&after[pos2..]);
            let end = end.ok_or_else(|| {
                PatchError::malformed(lineno, "no digits were found following ','")
            })?;
            end.checked_sub(start)
                .map(|d| d + 1)
                .ok_or_else(|| PatchError::malformed(lineno, "hunk range ends before it starts"))?
        } else {
            1
        };
        Ok((start, count))
    }

    fn require_tag_space(&self, line: &str) -> Result<()> {
        if line.len() < 2 || line.as_bytes()[1] != b' ' {
            return Err(PatchError::malformed(
                self.input_line,
                "second character must be a space",
            ));
        }
        Ok(())
    }

    fn expect_line(&mut self) -> Result<String> {
        let Some(line) = self.fetch_owned(self.input_line)? else {
            return Err(PatchError::malformed(
                self.input_line + 1,
                "unexpected end of file",
            ));
        };
        self.input_line += 1;
        Ok(line)
    }

    fn expect_tagged(&mut self, tag: char) -> Result<String> {
        let line = self.expect_line()?;
        if !line.starts_with(tag) {
            return Err(PatchError::malformed(
                self.input_line,
                format!("'{tag}' expected at start of line"),
            ));
        }
        Ok(line.get(2..).unwrap_or("").to_string())
    }
}

/// The file's own diff goofs on context lines: a hunk close enough to a
/// previous one picks up already-changed text as old-half context, which
/// would then never match the target. Wherever both halves hold a context
/// line at the same position but the text differs, the old-half copy takes
/// the new-half text, because only the old half is searched for.
fn repair_context(hunk: &mut Hunk) {
    let old_len = hunk.old_len;
    let pairs = old_len.min(hunk.lines.len() - old_len);
    for i in 0..pairs {
        if hunk.lines[i].kind != LineKind::Context
            || hunk.lines[old_len + i].kind != LineKind::Context
        {
            break;
        }
        if hunk.lines[i].text != hunk.lines[old_len + i].text {
            hunk.lines[i].text = hunk.lines[old_len + i].text.clone();
        }
    }
}

/// Longest leading-whitespace prefix shared by every non-empty listing
/// line. Patches quoted in mail or pasted into scripts often carry one.
fn common_indent(listing: &mut LineStore) -> Result<String> {
    let mut prefix: Option<String> = None;
    for i in 0..listing.line_count() {
        let Some(line) = listing.fetch(i)? else { break };
        if line.is_empty() {
            continue;
        }
        let lead_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        let lead = &line[..lead_len];
        match prefix {
            None => prefix = Some(lead.to_string()),
            Some(ref mut p) => {
                let shared = p
                    .bytes()
                    .zip(lead.bytes())
                    .take_while(|(a, b)| a == b)
                    .count();
                p.truncate(shared);
                if p.is_empty() {
                    break;
                }
            }
        }
    }
    Ok(prefix.unwrap_or_default())
}

fn payload(line: &str) -> String {
    line.get(2..).unwrap_or("").to_string()
}

fn tail(line: &str) -> String {
    line.get(1..).unwrap_or("").to_string()
}

fn lead_number(s: &str) -> (Option<usize>, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return (None, s);
    }
    (s[..end].parse().ok(), &s[end..])
}

/// Parse `start[,count]` as unified headers use, skipping the `-`/`+` sign.
fn unified_range(s: &str, lineno: usize) -> Result<(usize, usize, &str)> {
    let pos = s
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| PatchError::malformed(lineno, "no line range found in hunk header"))?;
    let (n, rest) = lead_number(&s[pos..]);
    let start =
        n.ok_or_else(|| PatchError::malformed(lineno, "no line range found in hunk header"))?;
    if let Some(r) = rest.strip_prefix(',') {
        let (c, r2) = lead_number(r);
        let count =
            c.ok_or_else(|| PatchError::malformed(lineno, "no digits were found following ','"))?;
        Ok((start, count, r2))
    } else {
        Ok((start, 1, rest))
    }
}
