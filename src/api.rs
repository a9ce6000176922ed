use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use ureq::{Agent, Request};

use crate::{
    error::SyncError,
    model::{FileRecord, Response},
};

pub const DEFAULT_API_BASE: &str = "https://api.curseforge.com/v1";
/// The largest page CurseForge will return
pub const MAX_PAGE_SIZE: u32 = 50;

/// The two lookups the selector needs from the mod host
#[cfg_attr(test, mockall::automock)]
pub trait FilesApi {
    /// Most recent files of a project, newest first, one page only
    fn list_files(&self, project_id: u64) -> Result<Vec<FileRecord>, SyncError>;
    /// A single file of a project
    fn get_file(&self, project_id: u64, file_id: u64) -> Result<FileRecord, SyncError>;
}

#[derive(Debug, Clone)]
pub struct CurseForge {
    agent: Agent,
    base: String,
    api_key: String,
    page_size: u32,
}

impl CurseForge {
    /// # Errors
    /// * The API key is empty
    pub fn new(base: impl Into<String>, api_key: impl Into<String>) -> Result<Self, SyncError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SyncError::InvalidConfig("API key must not be empty".into()));
        }

        Ok(Self {
            agent: Agent::new(),
            base: base.into().trim_end_matches('/').to_string(),
            api_key,
            page_size: MAX_PAGE_SIZE,
        })
    }

    /// # Errors
    /// * `page_size` is 0 or larger than [`MAX_PAGE_SIZE`]
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self, SyncError> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(SyncError::InvalidConfig(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }
        self.page_size = page_size;
        Ok(self)
    }

    fn request(&self, path: &str) -> Request {
        let url = format!("{}{}", self.base, path);
        debug!("GET {url}");
        self.agent
            .get(&url)
            .set("x-api-key", &self.api_key)
            .set("accept", "application/json")
    }

    fn fetch<T: DeserializeOwned>(&self, req: Request) -> Result<T, SyncError> {
        let raw = match req.call() {
            Ok(res) => res.into_string()?,
            Err(ureq::Error::Status(status, res)) => {
                let body = res.into_string().unwrap_or_default();
                return Err(SyncError::ApiError { status, body });
            }
            Err(ureq::Error::Transport(e)) => return Err(e.into()),
        };
        trace!("Response body: {raw}");
        let parsed: Response<T> = serde_json::from_str(&raw)?;

        Ok(parsed.data)
    }
}

impl FilesApi for CurseForge {
    fn list_files(&self, project_id: u64) -> Result<Vec<FileRecord>, SyncError> {
        let req = self
            .request(&format!("/mods/{project_id}/files"))
            .query("pageSize", &self.page_size.to_string())
            .query("sortField", "FileDate")
            .query("sortOrder", "desc");
        let files: Vec<FileRecord> = self.fetch(req)?;
        debug!("Got {} files for project {project_id}", files.len());

        Ok(files)
    }

    fn get_file(&self, project_id: u64, file_id: u64) -> Result<FileRecord, SyncError> {
        self.fetch(self.request(&format!("/mods/{project_id}/files/{file_id}")))
    }
}
