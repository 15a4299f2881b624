//! Ed-script replay. The engine does not interpret ed commands itself; it
//! hands the target and the script to the external `ed` program and reloads
//! the result.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{PatchError, Result};
use crate::store::LineStore;

/// Write the target to a scratch path, feed `script` (plus `w`/`q`) to
/// `ed -`, and reload the rewritten file into the store.
pub fn run_ed_script(target: &mut LineStore, script: &[String]) -> Result<()> {
    let dir = tempfile::tempdir().map_err(|e| PatchError::io("creating scratch directory", e))?;
    let path = dir.path().join("ed-target");
    target.sync(crate::store::SyncDest::Path(&path))?;

    tracing::debug!(commands = script.len(), "replaying ed script");
    let mut child = Command::new("ed")
        .arg("-")
        .arg(&path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| PatchError::io("spawning ed", e))?;
    {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PatchError::aborted("could not open a pipe to ed"))?;
        for line in script {
            writeln!(stdin, "{line}").map_err(|e| PatchError::io("writing to ed", e))?;
        }
        stdin
            .write_all(b"w\nq\n")
            .map_err(|e| PatchError::io("writing to ed", e))?;
    }
    let status = child
        .wait()
        .map_err(|e| PatchError::io("waiting for ed", e))?;
    if !status.success() {
        return Err(PatchError::aborted(format!(
            "ed exited with status {status}"
        )));
    }
    target.reload_from(&path)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn ed_available() -> bool {
        Command::new("ed")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .and_then(|mut child| {
                if let Some(mut stdin) = child.stdin.take() {
                    let _ = stdin.write_all(b"q\n");
                }
                child.wait()
            })
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_ed_script_rewrites_target() {
        if !ed_available() {
            return;
        }
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"one\ntwo\nthree\n").unwrap();
        let mut target = LineStore::open(Some(f.path())).unwrap();
        let script = vec![
            "2c".to_string(),
            "TWO".to_string(),
            ".".to_string(),
            "3d".to_string(),
        ];
        run_ed_script(&mut target, &script).unwrap();
        assert_eq!(target.line_count(), 2);
        assert_eq!(target.fetch(0).unwrap(), Some("one"));
        assert_eq!(target.fetch(1).unwrap(), Some("TWO"));
    }
}
