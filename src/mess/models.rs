use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A mess, identified by its sequential `mess_id`
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Mess {
    pub mess_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
    pub created_at: String,
}

#[derive(Deserialize, Debug)]
pub struct CreateMessInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessListResponse {
    pub messes: Vec<Mess>,
    pub total: usize,
}
