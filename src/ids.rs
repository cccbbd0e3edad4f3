// src/ids.rs
use uuid::Uuid;

/// Fresh, unguessable poll identifier.
pub fn poll_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Vote-record identifier, deterministic per `(poll_id, voter_id)` so a second
/// ballot from the same voter collides on the primary key as well as on the
/// uniqueness index.
pub fn vote_record_id(poll_id: &str, voter_id: &str) -> String {
    format!("{poll_id}:{voter_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_ids_are_unique() {
        assert_ne!(poll_id(), poll_id());
    }

    #[test]
    fn vote_record_id_is_deterministic() {
        assert_eq!(vote_record_id("p1", "alice"), vote_record_id("p1", "alice"));
        assert_ne!(vote_record_id("p1", "alice"), vote_record_id("p1", "bob"));
        assert_ne!(vote_record_id("p1", "alice"), vote_record_id("p2", "alice"));
    }
}
