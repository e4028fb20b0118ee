//! Workspace token generation.
//!
//! Workspaces are named by an 8-character random ASCII-letter token. With
//! a 52-letter pool the space is 52^8 (~5.3e13) names, so collisions are
//! improbable but not impossible; the job runner commits a token only
//! after checking that no directory with that name exists.

use rand::Rng;

/// Token length, fixed by the workspace naming convention.
pub const TOKEN_LEN: usize = 8;

const POOL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generate a fresh random workspace token.
pub fn workspace_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| POOL[rng.random_range(0..POOL.len())] as char)
        .collect()
}
