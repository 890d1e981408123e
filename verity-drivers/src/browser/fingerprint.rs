use rand::seq::SliceRandom;

/// Used when a pool is configured with no usable entries.
pub const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Chooses the user agent presented by an outbound request or browser session.
pub trait UserAgentSource: Send + Sync {
    fn pick(&self) -> String;
}

#[derive(Debug, Clone)]
/// Small pool of plausible desktop user agents; each pick is uniform random.
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Build a pool, discarding blank entries.
    pub fn new(agents: impl IntoIterator<Item = String>) -> Self {
        let agents = agents
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        Self { agents }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl UserAgentSource for UserAgentPool {
    fn pick(&self) -> String {
        let mut rng = rand::thread_rng();
        self.agents
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| FALLBACK_USER_AGENT.to_string())
    }
}

#[derive(Debug, Clone)]
/// Always returns the same agent. Useful for tests and reproducible runs.
pub struct FixedUserAgent(pub String);

impl UserAgentSource for FixedUserAgent {
    fn pick(&self) -> String {
        self.0.clone()
    }
}
