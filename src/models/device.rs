use serde::Serialize;

/// A physical scanning station. `id` is assigned outside the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub project_ids: Vec<i64>,
}

impl Device {
    pub fn is_authorized_for(&self, project_id: i64) -> bool {
        self.project_ids.contains(&project_id)
    }
}
