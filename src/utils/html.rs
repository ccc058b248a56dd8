// src/utils/html.rs

/// Sanitizes authored question text before it is sent to a client.
///
/// Whitelist-based: formatting tags such as <b> or <p> survive, while
/// <script>, <iframe> and event-handler attributes are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

pub fn clean_all(inputs: &[String]) -> Vec<String> {
    inputs.iter().map(|s| clean_html(s)).collect()
}
