pub mod objects;

#[cfg(feature = "client")]
pub mod client;

/// Header carrying the plaintext API key on every `/api` request.
pub const API_KEY_HEADER: &str = "Pitchboard-Api-Key";
