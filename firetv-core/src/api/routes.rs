macro_rules! api_path {
    ($path:literal) => {
        concat!("/api", $path)
    };
}

/// Route definitions shared by the server and its clients
pub mod api {
    pub const ROOT: &str = "/api";

    pub mod transcript {
        pub const CHAPTERS: &str = api_path!("/transcript/chapters/{video_id}");
        /// Matched when the id segment is missing entirely.
        pub const CHAPTERS_BARE: &str = api_path!("/transcript/chapters/");
    }

    pub mod trailers {
        pub const FIND: &str = api_path!("/trailers");
    }

    pub mod content {
        pub const SEARCH: &str = api_path!("/content/search");
        pub const ENRICH: &str = api_path!("/content/enrich");
        pub const DETAILS: &str = api_path!("/content/details");
    }

    pub mod parties {
        pub const COLLECTION: &str = api_path!("/parties");
        pub const JOIN: &str = api_path!("/parties/{id}/join");
    }

    pub mod messages {
        pub const BY_PARTY: &str = api_path!("/messages/{party_id}");
    }

    pub mod roulette {
        pub const SPIN: &str = api_path!("/roulette/spin");
    }

    /// Per-user, bearer token required.
    pub mod watchlist {
        pub const COLLECTION: &str = api_path!("/watchlist");
        pub const STATISTICS: &str = api_path!("/watchlist/statistics");
        pub const NEXT: &str = api_path!("/watchlist/next");
        pub const BY_ID: &str = api_path!("/watchlist/{id}");
    }
}

pub const PING: &str = "/ping";
pub const HEALTH: &str = "/health";
pub const SOCKET: &str = "/socket";

/// Replace `{param}` placeholders in a route template.
pub fn fill(template: &str, params: &[(&str, &str)]) -> String {
    let mut path = template.to_string();
    for (name, value) in params {
        path = path.replace(&format!("{{{name}}}"), value);
    }
    path
}
