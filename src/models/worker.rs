use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Worker {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub second_last_name: String,
    pub category: String,
    pub phone: String,
    pub curp: Option<String>, // national population registry key
    pub nss: Option<String>,  // social security number
    pub created_at: String,
}

/// Fields required to register a new worker.
#[derive(Debug, Clone, Default)]
pub struct NewWorker {
    pub first_name: String,
    pub last_name: String,
    pub second_last_name: String,
    pub category: String,
    pub phone: String,
    pub curp: Option<String>,
    pub nss: Option<String>,
}

impl Worker {
    pub fn full_name(&self) -> String {
        format!(
            "{} {} {}",
            self.first_name, self.last_name, self.second_last_name
        )
        .trim_end()
        .to_string()
    }
}
