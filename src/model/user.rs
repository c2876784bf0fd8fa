use serde::{Deserialize, Serialize};

/// The signed-in user. Supplies the per-user storage namespace; the
/// store never inspects anything beyond the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_round_trip() {
        let user = User {
            id: "user-abc123".into(),
            email: "ada@example.com".into(),
            name: "ada".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }
}
