use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::heuristics::clean_token;
use crate::models::SourcePost;
use crate::stages::normalize;

/// Liberal URL matcher (schemes, www., and bare domains with a path)
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b((?:[a-z][\w-]+:(?:/{1,3}|[a-z0-9%])|www\d{0,3}[.]|[a-z0-9.\-]+[.][a-z]{2,4}/)(?:[^\s()<>]+|\(([^\s()<>]+|(\([^\s()<>]+\)))*\))+(?:\(([^\s()<>]+|(\([^\s()<>]+\)))*\)|[^\s`!()\[\]{};:'".,<>?«»“”‘’]))"#,
    )
    .unwrap()
});

/// Configuration for deciding which posts are worth checking for haiku
#[derive(Debug, Clone)]
pub struct ScreeningConfig {
    /// Required language tag
    pub language: String,
    /// Screen names never considered
    pub ignore_user_screen_names: Vec<String>,
    /// User ids never considered
    pub ignore_user_ids: Vec<String>,
    /// Authors must follow more accounts than this
    pub min_friends: u64,
    /// Authors must have more followers than this
    pub min_followers: u64,
    /// Minimum body length in characters
    pub min_body_chars: usize,
    /// Also screen the author's profile bio
    pub check_profile: bool,
    /// Match profile ignore entries as substrings instead of whole tokens
    pub profile_match_substring: bool,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            ignore_user_screen_names: vec![],
            ignore_user_ids: vec![],
            min_friends: 10,
            min_followers: 100,
            min_body_chars: 17,
            check_profile: true,
            profile_match_substring: false,
        }
    }
}

/// True if the text contains anything that looks like a URL
pub fn text_contains_url(text: &str) -> bool {
    URL_REGEX.is_match(text)
}

fn ignore_matches(
    text: &str,
    ignore_list: &[String],
    match_substring: bool,
    plurals: bool,
) -> bool {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    let present = |needle: &str| {
        if match_substring {
            lowered.contains(needle)
        } else {
            tokens.contains(&needle)
        }
    };

    ignore_list.iter().any(|line| {
        let line = line.to_lowercase();
        let words: Vec<&str> = line.split_whitespace().collect();
        !words.is_empty()
            && words.iter().all(|word| {
                if plurals {
                    [
                        word.to_string(),
                        format!("{}s", word),
                        format!("{}z", word),
                        format!("{}es", word),
                    ]
                    .iter()
                    .any(|form| present(form))
                } else {
                    present(word)
                }
            })
    })
}

/// True if every word of any single ignore-list line appears in the text
pub fn text_contains_ignore_list(
    text: &str,
    ignore_list: &[String],
    match_substring: bool,
) -> bool {
    ignore_matches(text, ignore_list, match_substring, false)
}

/// Like [`text_contains_ignore_list`], also accepting simple plurals
/// ("dog" matches "dogs"; "god dog" matches "dogs are gods").
pub fn text_contains_ignore_list_plural(
    text: &str,
    ignore_list: &[String],
    match_substring: bool,
) -> bool {
    ignore_matches(text, ignore_list, match_substring, true)
}

/// True if some token mixes letters and digits ("h3llo"), which cannot be counted
pub fn text_has_chars_digits_together(text: &str) -> bool {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    stripped.split_whitespace().any(|token| {
        let all_digits = token.chars().all(|c| c.is_ascii_digit());
        let all_letters = token.chars().all(char::is_alphabetic);
        !all_digits && !all_letters
    })
}

/// True if every ASCII letter is uppercase (vacuously true with no letters)
pub fn text_is_all_uppercase(text: &str) -> bool {
    text.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .all(|c| c.is_ascii_uppercase())
}

/// Text-level gate: no URLs, no ignored words, no "h3llo" tokens, not shouting
pub fn check_text(text: &str, ignore_list: &[String]) -> bool {
    !text_contains_url(text)
        && !text_contains_ignore_list_plural(&clean_token(&normalize(text)), ignore_list, false)
        && !text_has_chars_digits_together(text)
        && !text_is_all_uppercase(text)
}

/// Post-level gate: language, no entities, not a reply/quote/retweet, an
/// established author, and a body long enough to hold seventeen syllables.
pub fn check_post(post: &SourcePost, ignore_list: &[String], config: &ScreeningConfig) -> bool {
    let body = post.body();
    if body.is_empty() {
        return false;
    }

    let entities = &post.entities;
    let passes = check_text(body, ignore_list)
        && post.lang == config.language
        && entities.hashtags.is_empty()
        && entities.urls.is_empty()
        && entities.user_mentions.is_empty()
        && entities.symbols.is_empty()
        && !post.truncated
        && !post.is_quote_status
        && post.in_reply_to_status_id_str.as_deref().is_none_or(str::is_empty)
        && !post.retweeted
        && !config.ignore_user_screen_names.contains(&post.user.screen_name)
        && !config.ignore_user_ids.contains(&post.user.id_str)
        && post.user.friends_count > config.min_friends
        && post.user.followers_count > config.min_followers
        && body.chars().count() >= config.min_body_chars;

    if !passes {
        debug!("Post {} failed screening", post.id_str);
    }
    passes
}

/// Profile gate: the author's bio mentions nothing from the ignore list
pub fn check_profile(
    post: &SourcePost,
    ignore_profile_list: &[String],
    match_substring: bool,
) -> bool {
    let description = post.user.description.as_deref().unwrap_or_default();
    !text_contains_ignore_list(
        &clean_token(&normalize(description)),
        ignore_profile_list,
        match_substring,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn post(body: &str) -> SourcePost {
        let json = format!(
            r#"{{
                "id_str": "1",
                "text": {},
                "lang": "en",
                "user": {{
                    "id_str": "2",
                    "screen_name": "poet",
                    "followers_count": 500,
                    "friends_count": 50,
                    "description": "I write about my dogs"
                }}
            }}"#,
            serde_json::to_string(body).unwrap()
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_text_contains_url() {
        assert!(text_contains_url("look at https://example.com/x now"));
        assert!(text_contains_url("www.example.com"));
        assert!(text_contains_url("example.com/path"));
        assert!(!text_contains_url("no links in this one"));
    }

    #[test]
    fn test_ignore_list_plural() {
        let ignore = list(&["god dog"]);
        assert!(text_contains_ignore_list_plural("dogs are gods", &ignore, false));
        assert!(!text_contains_ignore_list_plural("doggies are godly", &ignore, false));
        assert!(!text_contains_ignore_list_plural("just a dog", &ignore, false));
    }

    #[test]
    fn test_ignore_list_substring() {
        let ignore = list(&["cat"]);
        assert!(text_contains_ignore_list("concatenate", &ignore, true));
        assert!(!text_contains_ignore_list("concatenate", &ignore, false));
    }

    #[test]
    fn test_chars_digits_together() {
        assert!(text_has_chars_digits_together("h3llo there"));
        assert!(!text_has_chars_digits_together("hello 2 you!"));
    }

    #[test]
    fn test_all_uppercase() {
        assert!(text_is_all_uppercase("STOP YELLING 123"));
        assert!(!text_is_all_uppercase("Stop yelling"));
    }

    #[test]
    fn test_check_post() {
        let config = ScreeningConfig::default();
        let ignore = list(&["spoiler"]);

        assert!(check_post(&post("the quiet morning light falls on the pond"), &ignore, &config));
        assert!(!check_post(&post("huge spoilers for the finale tonight"), &ignore, &config));
        assert!(!check_post(&post("too short"), &ignore, &config));

        let mut reply = post("the quiet morning light falls on the pond");
        reply.in_reply_to_status_id_str = Some("5".to_string());
        assert!(!check_post(&reply, &ignore, &config));
    }

    #[test]
    fn test_check_profile() {
        let p = post("anything at all");
        assert!(!check_profile(&p, &list(&["dogs"]), false));
        assert!(check_profile(&p, &list(&["cats"]), false));
    }
}
