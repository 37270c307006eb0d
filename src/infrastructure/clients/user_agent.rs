//! Browser user agents rotated across requests.

use rand::seq::SliceRandom;

pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1",
];

/// Pick one agent at random, falling back to the built-in pool when the
/// configured one is empty.
pub fn random_user_agent(pool: &[String]) -> &str {
    pool.choose(&mut rand::thread_rng())
        .map(String::as_str)
        .unwrap_or(DEFAULT_USER_AGENTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_from_configured_pool() {
        let pool = vec!["AgentA/1.0".to_string(), "AgentB/2.0".to_string()];
        for _ in 0..20 {
            let ua = random_user_agent(&pool);
            assert!(pool.iter().any(|candidate| candidate == ua));
        }
    }

    #[test]
    fn empty_pool_falls_back_to_browser_agent() {
        let ua = random_user_agent(&[]);
        assert!(ua.contains("Mozilla"));
    }
}
