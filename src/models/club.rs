use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Club {
    pub id: i64,
    pub name: String,     // ⇔ clubs.name (UNIQUE)
    pub created_at: String, // ⇔ clubs.created_at (ISO8601)
}

/// Club row enriched with the figures shown by `club show`.
#[derive(Debug, Clone, Serialize)]
pub struct ClubOverview {
    pub club: Club,
    pub members: i64,
    pub admins: i64,
    /// `None` until the first toggle creates the session state.
    pub accepting: Option<bool>,
}

impl Club {
    /// Club names are compared after trimming surrounding whitespace.
    pub fn normalize_name(raw: &str) -> String {
        raw.trim().to_string()
    }
}
