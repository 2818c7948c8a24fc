use serde::{Deserialize, Serialize};

use super::Engagement;

/// A post delivered by the stream, in the shape of the platform's status JSON
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SourcePost {
    /// Post identifier
    pub id_str: String,
    /// Short body text
    #[serde(default)]
    pub text: String,
    /// Full body for long posts
    #[serde(default)]
    pub extended_tweet: Option<ExtendedBody>,
    /// Language tag assigned upstream
    #[serde(default)]
    pub lang: String,
    pub user: Author,
    #[serde(default)]
    pub entities: Entities,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub is_quote_status: bool,
    #[serde(default)]
    pub in_reply_to_status_id_str: Option<String>,
    #[serde(default)]
    pub retweeted: bool,
    #[serde(default)]
    pub favorite_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExtendedBody {
    pub full_text: String,
}

/// Author of a post
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Author {
    #[serde(default)]
    pub id_str: String,
    #[serde(default)]
    pub screen_name: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub followers_count: u64,
    /// Accounts this author follows
    #[serde(default)]
    pub friends_count: u64,
    /// Profile bio
    #[serde(default)]
    pub description: Option<String>,
}

/// Entity lists attached to a post; only their presence matters here
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Entities {
    #[serde(default)]
    pub hashtags: Vec<serde_json::Value>,
    #[serde(default)]
    pub urls: Vec<serde_json::Value>,
    #[serde(default)]
    pub user_mentions: Vec<serde_json::Value>,
    #[serde(default)]
    pub symbols: Vec<serde_json::Value>,
}

impl SourcePost {
    /// Full body text if present, else the short text
    pub fn body(&self) -> &str {
        self.extended_tweet
            .as_ref()
            .map(|e| e.full_text.as_str())
            .unwrap_or(&self.text)
    }

    /// Current engagement counters carried by this status payload
    pub fn engagement(&self) -> Engagement {
        Engagement {
            favorite_count: self.favorite_count,
            retweet_count: self.retweet_count,
            followers_count: self.user.followers_count,
            verified: self.user.verified,
            screen_name: Some(self.user.screen_name.clone()).filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_post() {
        let json = r#"{
            "id_str": "99",
            "text": "short text",
            "extended_tweet": {"full_text": "the full long text"},
            "lang": "en",
            "user": {
                "id_str": "7",
                "screen_name": "poet",
                "verified": true,
                "followers_count": 250,
                "friends_count": 40
            },
            "favorite_count": 3,
            "retweet_count": 1
        }"#;

        let post: SourcePost = serde_json::from_str(json).unwrap();

        assert_eq!(post.body(), "the full long text");
        assert!(post.entities.hashtags.is_empty());
        assert!(post.in_reply_to_status_id_str.is_none());

        let engagement = post.engagement();
        assert_eq!(engagement.favorite_count, 3);
        assert_eq!(engagement.followers_count, 250);
        assert!(engagement.verified);
        assert_eq!(engagement.screen_name.as_deref(), Some("poet"));
    }
}
