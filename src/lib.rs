pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod patch;
pub mod select;

use tracing::debug;

use crate::{
    api::FilesApi,
    config::Config,
    error::SyncError,
    model::Candidate,
    patch::{patch_file, LineMatch, PatchOutcome},
};

pub mod prelude {
    pub use crate::api::{CurseForge, FilesApi};
    pub use crate::config::{api_key_from_env, Config};
    pub use crate::error::SyncError;
    pub use crate::model::{Candidate, FileRecord};
    pub use crate::patch::{patch_file, patch_text, LineMatch, PatchOutcome};
    pub use crate::select::SelectionPolicy;
    pub use crate::{sync, SyncReport};
}

/// What a run picked and what it did with the launch file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub candidate: Candidate,
    pub outcome: PatchOutcome,
}

/// Fetch the project's files, pick the latest server pack and point the launch file at it
///
/// # Errors
/// * Any API error, nothing is written in that case
/// * No server pack found, or no version in its file name
/// * The launch file is missing either assignment line
pub fn sync<A: FilesApi + ?Sized>(api: &A, config: &Config) -> Result<SyncReport, SyncError> {
    let files = api.list_files(config.project_id)?;
    let candidate = config.policy.select(files, api, config.project_id)?;
    debug!("Selected {candidate:?} using the {} policy", config.policy);

    let outcome = patch_file(
        &config.launch_file,
        &candidate,
        LineMatch::from(config.policy),
        config.dry_run,
    )?;

    Ok(SyncReport { candidate, outcome })
}

#[cfg(test)]
mod test {
    use std::fs;

    use crate::{
        api::MockFilesApi,
        config::Config,
        error::SyncError,
        model::FileRecord,
        patch::PatchOutcome,
        select::SelectionPolicy,
        sync,
    };

    fn listing() -> Vec<FileRecord> {
        vec![
            FileRecord {
                id: 100,
                file_name: "Modpack-1.2.zip".into(),
                file_date: Some("2024-01-01".into()),
                is_server_pack: Some(false),
                ..Default::default()
            },
            FileRecord {
                id: 101,
                file_name: "ServerFiles-0.10.0-beta.zip".into(),
                file_date: Some("2024-02-01".into()),
                is_server_pack: Some(true),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn updates_launch_file() {
        let dir = tempfile::tempdir().unwrap();
        let launch = dir.path().join("launch.sh");
        fs::write(&launch, "SERVER_VERSION=\"0.9.0\"\nSERVER_FILE_ID=50\n").unwrap();

        for policy in [SelectionPolicy::Strict, SelectionPolicy::Pointer] {
            let mut api = MockFilesApi::new();
            api.expect_list_files()
                .times(1)
                .returning(|_| Ok(listing()));
            api.expect_get_file().never();

            let config = Config {
                launch_file: launch.clone(),
                policy,
                ..Default::default()
            };
            let report = sync(&api, &config).unwrap();

            assert_eq!(report.candidate.id, 101);
            assert_eq!(
                fs::read_to_string(&launch).unwrap(),
                "SERVER_VERSION=\"0.10.0-beta\"\nSERVER_FILE_ID=101\n"
            );
            let expected = match policy {
                SelectionPolicy::Strict => PatchOutcome::Updated,
                SelectionPolicy::Pointer => PatchOutcome::Unchanged,
            };
            assert_eq!(report.outcome, expected);
        }
    }

    #[test]
    fn api_error_skips_patch() {
        let dir = tempfile::tempdir().unwrap();
        let launch = dir.path().join("launch.sh");
        let text = "SERVER_VERSION=\"0.9.0\"\nSERVER_FILE_ID=50\n";
        fs::write(&launch, text).unwrap();

        let mut api = MockFilesApi::new();
        api.expect_list_files().returning(|_| {
            Err(SyncError::ApiError {
                status: 403,
                body: "forbidden".into(),
            })
        });

        let config = Config {
            launch_file: launch.clone(),
            ..Default::default()
        };
        let err = sync(&api, &config).unwrap_err();

        assert!(err.to_string().contains("403"));
        assert_eq!(fs::read_to_string(&launch).unwrap(), text);
    }
}
