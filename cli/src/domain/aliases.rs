//! Operator shell aliases, kept as a marker-delimited block in the rc file.
//!
//! Pure byte-level reconciliation: callers read the rc file, ask for the new
//! content, and write it back only when it changed.

use std::path::{Path, PathBuf};

use crate::domain::report::ArtifactState;

/// systemctl verbs exposed as `<service>-<verb>` aliases.
const SYSTEMCTL_VERBS: &[&str] = &["start", "stop", "restart", "status"];

/// The alias block for one service.
#[derive(Debug, Clone)]
pub struct AliasBlock {
    service: String,
}

impl AliasBlock {
    #[must_use]
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    /// Sentinel line opening the block. Unique per service name.
    #[must_use]
    pub fn begin_marker(&self) -> String {
        format!("# >>> {} aliases >>>", self.service)
    }

    #[must_use]
    pub fn end_marker(&self) -> String {
        format!("# <<< {} aliases <<<", self.service)
    }

    fn alias_prefix(&self) -> String {
        format!("alias {}-", self.service)
    }

    /// Full block text including both markers and a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let svc = &self.service;
        let mut out = self.begin_marker();
        out.push('\n');
        for verb in SYSTEMCTL_VERBS {
            out.push_str(&format!("alias {svc}-{verb}='sudo systemctl {verb} {svc}'\n"));
        }
        out.push_str(&format!("alias {svc}-logs='sudo journalctl -u {svc} -f'\n"));
        out.push_str(&self.end_marker());
        out.push('\n');
        out
    }

    /// Compute the rc file content with exactly one current block.
    ///
    /// Works on raw bytes: only the ASCII marker and alias lines are
    /// interpreted, everything else is copied through untouched whatever its
    /// encoding.
    ///
    /// Returns `None` when `rc` already holds exactly the current block.
    /// Stale, truncated, and duplicate blocks are collapsed into a single
    /// fresh block at the position of the first one, and orphaned end
    /// markers are dropped. A missing block is appended after a blank
    /// separator line.
    #[must_use]
    pub fn reconcile(&self, rc: &[u8]) -> Option<Vec<u8>> {
        let begin = self.begin_marker();
        let end = self.end_marker();
        let prefix = self.alias_prefix();
        let block = self.render();

        let lines: Vec<&[u8]> = rc.split_inclusive(|&b| b == b'\n').collect();
        let mut out = Vec::with_capacity(rc.len() + block.len());
        let mut inserted = false;
        let mut i = 0;

        while i < lines.len() {
            if is_marker(lines[i], &end) {
                // Orphaned end marker with no block around it.
                i += 1;
                continue;
            }
            if !is_marker(lines[i], &begin) {
                out.extend_from_slice(lines[i]);
                i += 1;
                continue;
            }

            let rest = &lines[i + 1..];
            let end_at = rest.iter().position(|l| is_marker(l, &end));
            let next_begin = rest.iter().position(|l| is_marker(l, &begin));
            let skip = match (end_at, next_begin) {
                (Some(e), Some(b)) if b < e => partial_len(rest, &prefix),
                (Some(e), _) => e + 1,
                (None, _) => partial_len(rest, &prefix),
            };

            if !inserted {
                out.extend_from_slice(block.as_bytes());
                inserted = true;
            }
            i += 1 + skip;
        }

        if !inserted {
            if !out.is_empty() {
                if !out.ends_with(b"\n") {
                    out.push(b'\n');
                }
                out.push(b'\n');
            }
            out.extend_from_slice(block.as_bytes());
        }

        (out != rc).then_some(out)
    }

    /// Classify the block in `rc` without modifying anything.
    #[must_use]
    pub fn inspect(&self, rc: &[u8]) -> ArtifactState {
        let begin = self.begin_marker();
        if !rc.split(|&b| b == b'\n').any(|l| is_marker(l, &begin)) {
            return ArtifactState::Missing;
        }
        match self.reconcile(rc) {
            None => ArtifactState::Current,
            Some(_) => ArtifactState::Stale,
        }
    }
}

fn is_marker(line: &[u8], marker: &str) -> bool {
    line.trim_ascii_end() == marker.as_bytes()
}

/// Length of a truncated block body: consecutive alias lines for this service.
fn partial_len(rest: &[&[u8]], prefix: &str) -> usize {
    rest.iter()
        .take_while(|l| l.starts_with(prefix.as_bytes()))
        .count()
}

/// Pick the rc file for the operator's shell: `.zshrc` for zsh, `.bashrc`
/// otherwise.
#[must_use]
pub fn rc_file_for(home: &Path, shell: &str) -> PathBuf {
    let name = Path::new(shell)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if name == "zsh" {
        home.join(".zshrc")
    } else {
        home.join(".bashrc")
    }
}
