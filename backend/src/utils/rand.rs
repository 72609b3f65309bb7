use rand::{Rng, distributions::Alphanumeric};

/// Opaque identifier handed to a player at login; keys their quiz session.
pub fn generate_player_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
