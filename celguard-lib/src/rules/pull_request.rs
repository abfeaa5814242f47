/// The pull request attributes that rules can inspect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestSnapshot {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub author: String,
    pub base_ref: String,
    pub head_ref: String,

    /// Label names in the order the event payload lists them, duplicates included
    pub labels: Vec<String>,
}
