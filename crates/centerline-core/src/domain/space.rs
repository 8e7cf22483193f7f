//! Leasable space within a shopping center

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Space {
    pub id: Uuid,
    pub center_id: Uuid,
    /// Dedup key inside the center; `None` when the row carried no suite.
    #[serde(skip_serializing)]
    pub space_key: Option<String>,
    pub suite_number: Option<String>,
    pub square_footage: Option<i64>,
}

impl Space {
    pub fn new(
        center_id: Uuid,
        space_key: Option<String>,
        suite_number: Option<String>,
        square_footage: Option<i64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            center_id,
            space_key,
            suite_number,
            square_footage,
        }
    }
}
