//! # Portiere (Session Gate)
//!
//! `portiere` is a small credential gate: it registers users, logs them in
//! and out of cookie-backed sessions, and keeps a couple of read endpoints
//! behind an authenticated-session check.
//!
//! Passwords are stored as bcrypt hashes and verified on the blocking
//! thread pool so one client's hashing work never stalls another's
//! requests. Sessions are opaque random tokens handed to the client in an
//! `HttpOnly` cookie; the database keeps only a SHA-256 hash of the token,
//! so a leaked table cannot be replayed as cookies.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
