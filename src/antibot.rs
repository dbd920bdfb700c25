//! Browser fingerprint pieces sent with upstream requests.

/// Collection of realistic desktop user agents for rotation
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
];

/// Get a random user agent string
pub fn get_random_user_agent() -> &'static str {
    use rand::Rng;
    let index = rand::rng().random_range(0..USER_AGENTS.len());
    USER_AGENTS[index]
}

/// Headers the web client sends alongside every GraphQL call.
pub fn get_web_client_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("x-twitter-active-user", "yes"),
        ("x-twitter-client-language", "en"),
        ("accept", "*/*"),
        ("accept-language", "en-US,en;q=0.9"),
    ]
}
