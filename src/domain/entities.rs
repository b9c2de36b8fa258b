use serde::Serialize;

/// A persisted blog post. `id` and `date` are assigned by the store on
/// creation and never change afterwards; edits only touch `title` and `body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub body: String,
    /// Creation day as `YYYY-MM-DD`, stamped once when the row is inserted.
    pub date: String,
}
