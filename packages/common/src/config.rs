use serde::Deserialize;

/// Contest-wide knobs shared by the server and its tests.
#[derive(Debug, Deserialize, Clone)]
pub struct ContestConfig {
    /// Page size of the submission history. Default: 20.
    #[serde(default = "default_submissions_per_page")]
    pub submissions_per_page: u64,
    /// Role name (from the auth token) allowed to browse every team's
    /// submissions and clear the aggregate cache. Default: "admin".
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
}

fn default_submissions_per_page() -> u64 {
    20
}
fn default_admin_role() -> String {
    "admin".into()
}

impl Default for ContestConfig {
    fn default() -> Self {
        Self {
            submissions_per_page: default_submissions_per_page(),
            admin_role: default_admin_role(),
        }
    }
}
