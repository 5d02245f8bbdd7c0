use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde_json::Value;

use super::member::FamilyMember;
use super::wire::MemberRecord;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One mutation against the members store. Worker threads execute these in
/// order and stop at the first failure; there is no transaction across calls.
#[derive(Clone, Debug)]
pub enum BackendCall {
    Insert(MemberRecord),
    Update { id: String, record: MemberRecord },
    Patch { id: String, patch: Value },
    Delete { id: String },
}

/// Blocking client for the hosted members store. Cheap to clone; used only
/// from worker threads, never on the UI thread.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::blocking::Client,
    base_url: String,
    family: String,
}

impl BackendClient {
    pub fn new(base_url: &str, family: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            family: family.to_owned(),
        })
    }

    fn members_url(&self) -> String {
        format!("{}/families/{}/members", self.base_url, self.family)
    }

    fn member_url(&self, id: &str) -> String {
        format!("{}/{id}", self.members_url())
    }

    pub fn list_members(&self) -> Result<Vec<FamilyMember>> {
        let cache_bust = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis().to_string())
            .unwrap_or_default();

        let records = self
            .http
            .get(self.members_url())
            .query(&[("t", cache_bust.as_str())])
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .with_context(|| format!("failed to fetch members for family {}", self.family))?
            .json::<Vec<MemberRecord>>()
            .context("failed to decode member list")?;

        Ok(records
            .into_iter()
            .filter_map(MemberRecord::into_member)
            .collect())
    }

    pub fn execute(&self, call: &BackendCall) -> Result<()> {
        match call {
            BackendCall::Insert(record) => self
                .http
                .post(self.members_url())
                .json(record)
                .send()
                .and_then(reqwest::blocking::Response::error_for_status)
                .context("failed to insert member")
                .map(drop),
            BackendCall::Update { id, record } => self
                .http
                .put(self.member_url(id))
                .json(record)
                .send()
                .and_then(reqwest::blocking::Response::error_for_status)
                .with_context(|| format!("failed to update member {id}"))
                .map(drop),
            BackendCall::Patch { id, patch } => self
                .http
                .patch(self.member_url(id))
                .json(patch)
                .send()
                .and_then(reqwest::blocking::Response::error_for_status)
                .with_context(|| format!("failed to patch member {id}"))
                .map(drop),
            BackendCall::Delete { id } => self
                .http
                .delete(self.member_url(id))
                .send()
                .and_then(reqwest::blocking::Response::error_for_status)
                .with_context(|| format!("failed to delete member {id}"))
                .map(drop),
        }
    }
}
