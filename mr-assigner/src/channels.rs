//! Static project → chat channels table, loaded once at startup.

use std::collections::HashMap;
use std::str::FromStr;

use crate::errors::ChannelTableError;

/// Which chat channels hear about a project's merge requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelTable {
    by_project: HashMap<u64, Vec<String>>,
}

impl ChannelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, project_id: u64, channels: Vec<String>) {
        self.by_project.insert(project_id, channels);
    }

    /// Channels for `project_id`; empty when the project is not listed.
    pub fn channels_for(&self, project_id: u64) -> &[String] {
        self.by_project
            .get(&project_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_project.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_project.is_empty()
    }
}

impl FromStr for ChannelTable {
    type Err = ChannelTableError;

    /// Parses `42=#team,#reviews;7=#ops`. Blank input is an empty table.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut table = ChannelTable::new();

        for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (project, channels) = entry
                .split_once('=')
                .ok_or_else(|| ChannelTableError::InvalidEntry(entry.to_string()))?;

            let project = project.trim();
            let project_id = project
                .parse::<u64>()
                .map_err(|_| ChannelTableError::InvalidProjectId(project.to_string()))?;

            let channels: Vec<String> = channels
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            if channels.is_empty() {
                return Err(ChannelTableError::EmptyChannels(project_id));
            }

            table
                .by_project
                .entry(project_id)
                .or_default()
                .extend(channels);
        }

        Ok(table)
    }
}
