/// Construct Chrome command-line arguments for a session presenting
/// `user_agent`.
pub fn build_browser_arguments(user_agent: &str, headless: bool) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        "--disable-extensions".to_string(),
        "--disable-plugins-discovery".to_string(),
        // fresh profile per session so no cookies or storage leak across requests
        "--incognito".to_string(),
        format!("--user-agent={user_agent}"),
        "--window-size=1366,768".to_string(),
        "--lang=en-US,en".to_string(),
    ];
    if headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    args
}
