use serde::Serialize;

/// Attendance-lateness category assigned to a QR check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LatenessCategory {
    Puntual,     // on time
    RetardoLeve, // minor delay
    RetardoAlto, // major delay
}

impl LatenessCategory {
    /// Convert enum → DB / wire string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            LatenessCategory::Puntual => "puntual",
            LatenessCategory::RetardoLeve => "retardo_leve",
            LatenessCategory::RetardoAlto => "retardo_alto",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "puntual" => Some(LatenessCategory::Puntual),
            "retardo_leve" => Some(LatenessCategory::RetardoLeve),
            "retardo_alto" => Some(LatenessCategory::RetardoAlto),
            _ => None,
        }
    }

}
