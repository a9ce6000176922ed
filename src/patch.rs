use std::{fs, path::Path};

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use tracing::{debug, error};

use crate::{error::SyncError, model::Candidate, select::SelectionPolicy};

lazy_static! {
    static ref VERSION_QUOTED: Regex =
        Regex::new(r#"(?mR)^SERVER_VERSION=".*"$"#).expect("Unable to compile version regex");
    static ref VERSION_ANY: Regex =
        Regex::new(r"(?mR)^SERVER_VERSION=.*$").expect("Unable to compile version regex");
    static ref FILE_ID_DIGITS: Regex =
        Regex::new(r"(?mR)^SERVER_FILE_ID=[0-9]+$").expect("Unable to compile file id regex");
    static ref FILE_ID_ANY: Regex =
        Regex::new(r"(?mR)^SERVER_FILE_ID=.*$").expect("Unable to compile file id regex");
}

/// Which existing `SERVER_VERSION` / `SERVER_FILE_ID` lines are accepted as replace targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMatch {
    /// `SERVER_VERSION="..."` and `SERVER_FILE_ID=<digits>` only
    Strict,
    /// Anything after the `=`
    Permissive,
}

impl From<SelectionPolicy> for LineMatch {
    fn from(policy: SelectionPolicy) -> Self {
        match policy {
            SelectionPolicy::Strict => Self::Strict,
            SelectionPolicy::Pointer => Self::Permissive,
        }
    }
}

impl LineMatch {
    fn patterns(self) -> [&'static Regex; 2] {
        match self {
            Self::Strict => [&*VERSION_QUOTED, &*FILE_ID_DIGITS],
            Self::Permissive => [&*VERSION_ANY, &*FILE_ID_ANY],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The file already held these values
    Unchanged,
    Updated,
    /// Dry run, the file would have been rewritten
    WouldUpdate,
}

/// Rewrite the two assignment lines in `text`
///
/// Only the first match of each pattern is replaced. Fails on the first pattern that is missing
pub fn patch_text(text: &str, candidate: &Candidate, mode: LineMatch) -> Result<String, SyncError> {
    let [version, file_id] = mode.patterns();
    let replacements = [
        (version, format!("SERVER_VERSION=\"{}\"", candidate.server_version)),
        (file_id, format!("SERVER_FILE_ID={}", candidate.id)),
    ];

    let mut out = text.to_string();
    for (pattern, line) in replacements {
        if !pattern.is_match(&out) {
            return Err(SyncError::PatternNotFound(pattern.as_str().to_string()));
        }
        out = pattern.replace(&out, NoExpand(&line)).into_owned();
    }

    Ok(out)
}

/// Point the launch file at `candidate`
///
/// The file is only written when every pattern matched and the text actually changed
pub fn patch_file(
    path: impl AsRef<Path>,
    candidate: &Candidate,
    mode: LineMatch,
    dry_run: bool,
) -> Result<PatchOutcome, SyncError> {
    let path = path.as_ref();
    let original = fs::read_to_string(path)?;

    let updated = patch_text(&original, candidate, mode).map_err(|e| {
        error!("Unable to patch {}", path.display());
        e
    })?;

    if updated == original {
        debug!("{} is already up to date", path.display());
        return Ok(PatchOutcome::Unchanged);
    }

    if dry_run {
        debug!("Dry run, not writing {}", path.display());
        return Ok(PatchOutcome::WouldUpdate);
    }

    fs::write(path, updated)?;
    debug!("Wrote file at {}", path.display());

    Ok(PatchOutcome::Updated)
}
