//! Opaque code generation for sessions, pictures and rendered files.

use uuid::Uuid;

/// Returns a fresh 32-character lowercase hex code drawn from 122 random bits.
pub fn make_unique_id() -> String {
    Uuid::new_v4().simple().to_string()
}
