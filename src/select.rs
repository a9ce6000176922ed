use std::{cmp::Ordering, fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    api::FilesApi,
    error::SyncError,
    model::{Candidate, FileRecord},
};

lazy_static! {
    static ref SERVER_FILES: Regex =
        Regex::new(r"^ServerFiles-(.+)\.zip$").expect("Unable to compile server files regex");
    static ref SERVER_FILES_NOCASE: Regex = Regex::new(r"(?i)^ServerFiles-(.+)\.zip$")
        .expect("Unable to compile server files regex");
    static ref LOOSE_SEMVER: Regex = Regex::new(r"\d+\.\d+\.\d+(?:-[A-Za-z0-9.]+)?")
        .expect("Unable to compile semver regex");
}

/// How the latest server pack is picked out of a project's files
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Only files flagged as server packs or named exactly `ServerFiles-<version>.zip`
    Strict,
    /// Follow `serverPackFileId` from the newest file that has one, falling back to file names
    #[default]
    Pointer,
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "pointer" => Ok(Self::Pointer),
            other => Err(format!(
                "unknown selection policy '{other}', expected 'strict' or 'pointer'"
            )),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Pointer => write!(f, "pointer"),
        }
    }
}

impl SelectionPolicy {
    /// Pick the latest server pack from `files`
    ///
    /// Only the pointer policy talks to `api`, and only when the chosen file references a server pack by id
    pub fn select<A: FilesApi + ?Sized>(
        self,
        files: Vec<FileRecord>,
        api: &A,
        project_id: u64,
    ) -> Result<Candidate, SyncError> {
        match self {
            Self::Strict => select_strict(files),
            Self::Pointer => select_pointer(files, api, project_id),
        }
    }
}

/// Newest `fileDate` first, highest `id` first on ties
pub fn sort_newest_first(files: &mut [FileRecord]) {
    files.sort_by(newest_first);
}

fn newest_first(a: &FileRecord, b: &FileRecord) -> Ordering {
    b.timestamp()
        .cmp(&a.timestamp())
        .then_with(|| b.id.cmp(&a.id))
}

pub fn select_strict(files: Vec<FileRecord>) -> Result<Candidate, SyncError> {
    let mut found: Vec<(FileRecord, String)> = files
        .into_iter()
        .filter(|f| {
            f.is_server_pack()
                || (f.file_name.starts_with("ServerFiles-") && f.file_name.ends_with(".zip"))
        })
        .filter_map(|f| {
            let version = strict_version(&f.file_name)?;
            Some((f, version))
        })
        .collect();
    debug!("{} files look like server packs", found.len());

    found.sort_by(|(a, _), (b, _)| newest_first(a, b));

    let (latest, server_version) = found.into_iter().next().ok_or(SyncError::NoServerFiles)?;

    Ok(Candidate {
        id: latest.id,
        file_name: latest.file_name,
        server_version,
    })
}

pub fn select_pointer<A: FilesApi + ?Sized>(
    mut files: Vec<FileRecord>,
    api: &A,
    project_id: u64,
) -> Result<Candidate, SyncError> {
    sort_newest_first(&mut files);

    let flagged = files
        .iter()
        .find(|f| f.server_pack_pointer().is_some() || f.is_server_pack())
        .cloned();

    let resolved = match flagged {
        Some(f) => match f.server_pack_pointer() {
            Some(pack_id) => {
                debug!("File {} points at server pack {pack_id}", f.id);
                api.get_file(project_id, pack_id)?
            }
            None => f,
        },
        None => {
            debug!("No file flagged as a server pack, falling back to file names");
            files
                .into_iter()
                .find(|f| {
                    let name = f.file_name.to_lowercase();
                    name.starts_with("serverfiles-") && name.ends_with(".zip")
                })
                .ok_or(SyncError::NoServerFiles)?
        }
    };

    let server_version = loose_version(&resolved.file_name)
        .ok_or_else(|| SyncError::NoVersion(resolved.file_name.clone()))?;

    Ok(Candidate {
        id: resolved.id,
        file_name: resolved.file_name,
        server_version,
    })
}

/// `ServerFiles-<version>.zip`, case-sensitive
pub fn strict_version(file_name: &str) -> Option<String> {
    SERVER_FILES
        .captures(file_name)
        .map(|c| c[1].to_string())
}

/// `ServerFiles-<version>.zip` in any case, else the first semver-looking run in the name
pub fn loose_version(file_name: &str) -> Option<String> {
    if let Some(c) = SERVER_FILES_NOCASE.captures(file_name) {
        return Some(c[1].to_string());
    }
    LOOSE_SEMVER
        .find(file_name)
        .map(|m| m.as_str().to_string())
}
