use super::identity::Identity;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    pub id: i64,
    pub club_id: i64,
    pub name: String,                  // ⇔ members.name
    pub identity: Identity,            // ⇔ members.identity_kind + members.identity
    pub attendance: u32,               // ⇔ members.attendance (never decreases)
    pub is_admin: bool,                // ⇔ members.is_admin (0/1)
    pub last_check_in: Option<String>, // ⇔ members.last_check_in (RFC3339)
    pub created_at: String,
}

/// Flat member row used by CSV / JSON roster export.
#[derive(Debug, Clone, Serialize)]
pub struct MemberExport {
    pub club: String,
    pub name: String,
    pub identity_kind: String,
    pub identity: String,
    pub attendance: u32,
    pub is_admin: bool,
    pub last_check_in: String,
}

impl MemberExport {
    pub fn from_member(club: &str, m: &Member) -> Self {
        Self {
            club: club.to_string(),
            name: m.name.clone(),
            identity_kind: m.identity.kind().to_string(),
            identity: m.identity.value().to_string(),
            attendance: m.attendance,
            is_admin: m.is_admin,
            last_check_in: m.last_check_in.clone().unwrap_or_default(),
        }
    }
}
