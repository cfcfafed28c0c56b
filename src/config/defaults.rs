//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [mapping] Section Defaults
// ============================================================================

pub mod mapping {
    /// Category every converted page is filed under.
    pub fn category_id() -> i64 {
        2
    }

    /// Author of converted pages; the export's users are not imported.
    pub fn unknown_author_id() -> i64 {
        crate::site::UNKNOWN_USER_ID
    }

    /// Author of the replies created from comments (the system user).
    pub fn reply_author_id() -> i64 {
        crate::site::SYSTEM_USER_ID
    }

    pub fn folder() -> String {
        "/".into()
    }

    pub mod placeholder {
        pub fn title() -> String {
            "Download $100 000 and a new car".into()
        }

        pub fn body() -> String {
            "Type your email and password, and the you can download a new car".into()
        }

        pub fn slug() -> String {
            "extra-page".into()
        }

        pub fn reply() -> String {
            "I give you goldy golden gold coins, glittery glittering!".into()
        }
    }
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    /// First id handed out to a post; ids below are left to the target site.
    pub fn first_post_id() -> i64 {
        101
    }

    /// 2020-01-01T17:30:00Z, used whenever the export has no usable date.
    pub fn created_at_ms() -> i64 {
        1_577_899_800_000
    }
}
