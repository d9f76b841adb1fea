use serde::Deserialize;

/// Options for driving the track point extractor over a GPX document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Match element names without their namespace prefix (default: true)
    #[serde(default = "default_true")]
    pub match_local_names: bool,

    /// Reject mismatched end tags in the tokenizer (default: true)
    #[serde(default = "default_true")]
    pub check_end_names: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            match_local_names: true,
            check_end_names: true,
        }
    }
}

fn default_true() -> bool {
    true
}
