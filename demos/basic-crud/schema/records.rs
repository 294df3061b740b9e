use chrono::{DateTime, Utc};

/// A permission level users can hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Role {
    #[sql("id,key")]
    #[table("roles")]
    pub id: i64,
    #[sql("name")]
    pub name: String,
}

/// A user account
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    #[sql("id,key")]
    #[table("users")]
    pub id: i64,
    #[sql("username")]
    pub username: String,
    #[sql("email")]
    pub email: String,
    #[sql("role_id")]
    #[fk("roles(id)")]
    pub role: i64,
    #[sql("last_seen")]
    pub last_seen: DateTime<Utc>,
    /// Not persisted
    pub session: Option<String>,
}

/// Membership of a user in a named group, keyed by both
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Membership {
    #[sql("user_id,key")]
    #[fk("users(id)")]
    #[table("memberships")]
    pub user_id: i64,
    #[sql("group_name")]
    #[key(true)]
    pub group: String,
    #[sql("level")]
    pub level: i32,
    #[sql("note")]
    pub note: Option<String>,
}
