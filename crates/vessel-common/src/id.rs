use uuid::Uuid;

const CORRELATION_ID_LEN: usize = 8;

/// Short random tag that ties together the log lines of one background job,
/// e.g. an update session.
pub fn new_correlation_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(CORRELATION_ID_LEN);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_ids_are_short_lowercase_hex() {
        let id = new_correlation_id();
        assert_eq!(id.len(), CORRELATION_ID_LEN);
        assert!(id.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }

    #[test]
    fn correlation_ids_differ_between_jobs() {
        let ids: std::collections::HashSet<_> = (0..32).map(|_| new_correlation_id()).collect();
        assert!(ids.len() > 30);
    }
}
