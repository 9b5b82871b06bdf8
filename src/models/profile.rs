/// Local owner identity. Every bill and income belongs to exactly one
/// profile; queries are always scoped by it.
#[derive(Debug, Clone)]
pub(crate) struct Profile {
    pub id: Option<i64>,
    pub name: String,
    pub created_at: String,
}

impl Profile {
    pub(crate) fn new(name: String) -> Self {
        Self {
            id: None,
            name,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
