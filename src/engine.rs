//! Per-unit orchestration: find the next patch in the listing, open its
//! target, then locate and apply (or reject) hunk after hunk.

use std::io;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::apply::apply;
use crate::ed::run_ed_script;
use crate::error::{PatchError, Result};
use crate::hunk::{Hunk, LineKind};
use crate::locate::{Placement, check_location};
use crate::parser::{DiffFormat, PatchReader};
use crate::reject::write_reject;
use crate::session::{Session, Settings};
use crate::store::{LineStore, SyncDest};

/// Work through the whole listing. Returns the exit status: 0 when every
/// hunk applied, 1 when any were rejected. Malformed input, I/O faults, and
/// declined confirmations surface as errors and become status 2.
pub fn run(settings: &Settings, listing: Option<&Path>) -> Result<u8> {
    let mut reader = PatchReader::open(listing, settings.silent)?;
    let mut session = Session::default();
    let mut any_rejected = false;
    while let Some((format, name)) = reader.next_patch_header(settings)? {
        session.reset(settings.reverse);
        let name = resolve_target(name, settings)?;
        let mut target = LineStore::open(Some(Path::new(&name)))?;
        tracing::debug!(file = %name, ?format, lines = target.line_count(), "patching");
        if !settings.silent {
            eprintln!("Patching file {name}...");
        }

        if matches!(format, DiffFormat::Ed | DiffFormat::ModifiedEd) {
            if session.reverse {
                return Err(PatchError::aborted(
                    "an ed script cannot be applied in reverse",
                ));
            }
            let script = reader.next_ed_commands()?;
            if script.is_empty() {
                return Err(PatchError::aborted("no ed commands found in the listing"));
            }
            run_ed_script(&mut target, &script)?;
            sync_target(&mut target, settings)?;
            if !settings.silent {
                eprintln!("done");
            }
            continue;
        }

        let mut rejects = LineStore::create()?;
        let mut hunk_no = 0usize;
        let mut failed = 0usize;
        while let Some(mut hunk) = reader.next_hunk()? {
            hunk_no += 1;
            if session.reverse {
                hunk.swap();
            }
            if session.reject_rest {
                failed += 1;
                write_reject(&mut rejects, &hunk)?;
                if !settings.silent {
                    eprintln!("Hunk #{hunk_no} ignored at {}.", position(&hunk, &session));
                }
                continue;
            }
            // The reversed-patch heuristic only makes sense on the first
            // hunk, and never for a pure-deletion normal hunk, whose
            // swapped form would match almost anywhere.
            let swappable = hunk_no == 1
                && !settings.force
                && !(format == DiffFormat::Normal && pure_deletion(&hunk));
            let placement = check_location(
                &mut target,
                &mut hunk,
                swappable,
                &mut session,
                settings.loose_match,
            )?;
            match placement {
                Placement::Found(at) => {
                    apply(
                        &mut target,
                        &hunk,
                        at,
                        settings.define.as_deref(),
                        &mut session,
                    )?;
                    if !settings.silent && session.last_offset != 0 {
                        eprintln!(
                            "Hunk #{hunk_no} succeeded at {} (offset {} lines).",
                            at + 1,
                            session.last_offset
                        );
                    }
                }
                Placement::FoundReversed(at) => {
                    let accept = !settings.force
                        && confirm(
                            "Reversed (or previously applied) patch detected!  Assume -R?",
                            true,
                        )?;
                    if accept {
                        session.reverse = !session.reverse;
                        apply(
                            &mut target,
                            &hunk,
                            at,
                            settings.define.as_deref(),
                            &mut session,
                        )?;
                    } else {
                        hunk.swap();
                        failed += 1;
                        write_reject(&mut rejects, &hunk)?;
                        session.reject_rest = true;
                        if !settings.silent {
                            eprintln!("Hunk #{hunk_no} ignored at {}.", position(&hunk, &session));
                        }
                    }
                }
                Placement::NotFound => {
                    failed += 1;
                    write_reject(&mut rejects, &hunk)?;
                    if !settings.silent {
                        eprintln!("Hunk #{hunk_no} failed at {}.", position(&hunk, &session));
                    }
                }
            }
        }

        sync_target(&mut target, settings)?;
        if failed > 0 {
            any_rejected = true;
            let reject_path = settings
                .reject_override
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("{name}.rej")));
            eprintln!(
                "{}",
                format!(
                    "{failed} out of {hunk_no} hunks failed--saving rejects to {}",
                    reject_path.display()
                )
                .red()
            );
            rejects.sync(SyncDest::Path(&reject_path))?;
        } else if !settings.silent {
            eprintln!("done");
        }
    }
    Ok(if any_rejected { 1 } else { 0 })
}

/// 1-based line the hunk was aimed at, for user messages.
fn position(hunk: &Hunk, session: &Session) -> i64 {
    hunk.old_start as i64 + session.drift
}

fn pure_deletion(hunk: &Hunk) -> bool {
    hunk.new_count() == 0 && hunk.old_half().iter().all(|l| l.kind == LineKind::Delete)
}

fn sync_target(target: &mut LineStore, settings: &Settings) -> Result<()> {
    match settings.output.as_deref() {
        Some(p) if p == Path::new("-") => target.sync(SyncDest::Stdout),
        Some(p) => target.sync(SyncDest::Path(p)),
        None => target.sync(SyncDest::InPlace),
    }
}

fn resolve_target(name: Option<String>, settings: &Settings) -> Result<String> {
    if let Some(over) = &settings.target_override {
        return Ok(over.display().to_string());
    }
    match name {
        Some(n) if n != "/dev/null" => Ok(n),
        _ => ask_filename(settings),
    }
}

fn ask_filename(settings: &Settings) -> Result<String> {
    if settings.force || settings.silent {
        return Err(PatchError::aborted("no file to patch"));
    }
    eprint!("File to patch: ");
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| PatchError::io("reading answer", e))?;
    let name = line.trim();
    if name.is_empty() {
        return Err(PatchError::aborted("no file to patch"));
    }
    Ok(name.to_string())
}

fn confirm(prompt: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "[y]" } else { "[n]" };
    eprint!("{} {hint} ", prompt.yellow());
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| PatchError::io("reading answer", e))?;
    Ok(match line.trim().chars().next() {
        Some('y' | 'Y') => true,
        Some('n' | 'N') => false,
        _ => default_yes,
    })
}
