//! Transit lines and their service status.

/// A named transit service (e.g. one underground line).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub id: String,
    pub name: String,

    /// Service status descriptions, merged in only when a listing
    /// explicitly asks for status. Never cached.
    pub status: Status,
}

impl Line {
    /// Placeholder for a line ID absent from the cached set.
    ///
    /// Unknown or newly introduced lines degrade to `{ID, Name=ID}`
    /// rather than failing the lookup.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            status: Status::default(),
        }
    }
}

/// Current service status for a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub descriptions: Vec<String>,
}
