//! Task board backing the tabbed task view

use taskmaster_core::{Task, TaskTab};

use crate::client::TaskClient;
use crate::error::ClientResult;

/// Active and archived task lists, loaded together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBoard {
    pub active: Vec<Task>,
    pub archived: Vec<Task>,
}

impl TaskBoard {
    /// Fetch both lists. Status tabs are filtered locally from the active list.
    pub async fn load(client: &TaskClient) -> ClientResult<Self> {
        let active = client.list_tasks(false).await?;
        let archived = client.list_tasks(true).await?;
        Ok(Self { active, archived })
    }

    pub fn tab(&self, tab: TaskTab) -> Vec<&Task> {
        if tab.is_archive() {
            tab.filter(&self.archived)
        } else {
            tab.filter(&self.active)
        }
    }

    /// Number of tasks per tab, in display order
    pub fn counts(&self) -> Vec<(TaskTab, usize)> {
        TaskTab::ALL
            .iter()
            .map(|tab| (*tab, self.tab(*tab).len()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.archived.is_empty()
    }
}
