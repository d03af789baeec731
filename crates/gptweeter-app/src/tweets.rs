//! Tweet feed generation.
//!
//! The model is asked for a JSON feed in a fixed shape. Replies that do not
//! parse are retried a few times on the same session; if none parse, a
//! static feed is returned so callers always get something to render.

use gptweeter_ai::{AiError, ChatEngine};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

pub const TWEET_MODEL: &str = "mixtral-8x7b-32768";

const MAX_ATTEMPTS: u32 = 3;

const SYSTEM_PROMPT: &str = r#"You are DankTweeterGPT.
Write only in this tweet like format (Example):
```{"tweets": [
    {
        "user_name": "Robin Hanson",
        "datetime": "1h ago",
        "text": "**Demanding Job Joke:**\n\"If you don't come in to work on Saturday, don't bother to come in on Sunday.\""
    },
    {
        "user_name": "Morning Brew",
        "datetime": "19h ago",
        "text": "You merely adopted the McDonald's. I was born in it, molded by it.\n🍔 MCDO"
    },
    {
        "user_name": "Terminally Online Engineer",
        "datetime": "Now",
        "text": "Me breaking prod:\n*No further details provided.*"
    }
]}
```
Return only this JSON format.
"#;

const TWEET_COUNTS: &[&str] = &["two", "three", "four", "five"];

const ADJECTIVES: &[&str] = &[
    "sarcastic",
    "wholesome",
    "unhinged",
    "overcaffeinated",
    "philosophical",
    "deadpan",
    "enthusiastic",
    "grumpy",
];

const CHARACTERS: &[&str] = &[
    "pirate",
    "physics professor",
    "startup founder",
    "medieval knight",
    "park ranger",
    "stand-up comedian",
    "librarian",
    "sports commentator",
];

const TOPICS: &[&str] = &[
    "duck evolution",
    "black holes",
    "sourdough baking",
    "the history of coffee",
    "octopus intelligence",
    "compound interest",
    "volcanoes",
    "the Roman aqueducts",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub user_name: String,
    pub datetime: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetFeed {
    pub tweets: Vec<Tweet>,
}

/// The randomized parts of one feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetPrompt {
    pub count: &'static str,
    pub author: String,
    pub topic: String,
}

impl TweetPrompt {
    /// Pick a count and author at random; the topic too unless one is given.
    pub fn random(topic: Option<&str>, rng: &mut impl Rng) -> Self {
        let topic = match topic.map(str::trim) {
            Some(t) if !t.is_empty() && t != "random" => t.to_string(),
            _ => pick(TOPICS, rng).to_string(),
        };
        Self {
            count: pick(TWEET_COUNTS, rng),
            author: format!("{} {}", pick(ADJECTIVES, rng), pick(CHARACTERS, rng)),
            topic,
        }
    }

    pub fn text(&self) -> String {
        format!(
            "Give me {} educational/insightful yet fun tweets about {} in the style of {}. \
             Make each tweet by a different user.",
            self.count, self.topic, self.author
        )
    }
}

fn pick(options: &[&'static str], rng: &mut impl Rng) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

/// Generate a feed about `topic` with `model`. Never fails: after
/// [`MAX_ATTEMPTS`] unusable replies the static feed is returned.
pub async fn generate_feed(engine: &ChatEngine, topic: Option<&str>, model: &str) -> TweetFeed {
    let prompt = TweetPrompt::random(topic, &mut rand::thread_rng());
    info!(topic = %prompt.topic, author = %prompt.author, model, "generating tweets");

    let mut session = match engine.create_session(SYSTEM_PROMPT, Some(model)) {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "cannot start tweet session, serving fallback feed");
            return fallback_feed();
        }
    };

    for attempt in 1..=MAX_ATTEMPTS {
        let result = match session.chat(prompt.text()).await {
            Ok(reply) => parse_feed(&reply),
            Err(e) => Err(e),
        };
        match result {
            Ok(feed) => {
                info!(attempt, tweets = feed.tweets.len(), "tweets generated");
                return feed;
            }
            Err(e) => warn!(attempt, max_attempts = MAX_ATTEMPTS, error = %e, "tweet attempt failed"),
        }
    }

    error!(attempts = MAX_ATTEMPTS, "no usable tweets, serving fallback feed");
    fallback_feed()
}

/// Parse a model reply into a feed, tolerating a surrounding code fence and
/// raw control characters inside string values.
pub fn parse_feed(reply: &str) -> Result<TweetFeed, AiError> {
    let json = escape_control_chars(strip_code_fence(reply));
    serde_json::from_str(&json)
        .map_err(|e| AiError::MalformedProviderResponse(format!("tweet feed: {e}")))
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop a language tag such as ```json.
    let inner = inner.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    inner.trim()
}

/// Escape control characters that appear inside JSON strings. Models often
/// emit literal newlines in tweet text, which strict JSON rejects.
fn escape_control_chars(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in json.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() && (c as u32) < 0x20 => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
    }
    out
}

fn tweet(user_name: &str, text: &str) -> Tweet {
    Tweet {
        user_name: user_name.to_string(),
        datetime: "Just now".to_string(),
        text: text.to_string(),
    }
}

/// Served when the model never produces a usable feed.
pub fn fallback_feed() -> TweetFeed {
    TweetFeed {
        tweets: vec![
            tweet(
                "Dr. Quack Evolutionary Tales",
                "Duck Bill Evolution 101: Ducks evolved bills as a versatile tool for feeding. \
                 Whether it's sifting through water for plants, catching insects, or preying on \
                 small fish, their bills are perfectly adapted. Nature's Swiss Army knife for our \
                 feathery friends! 🦆💡 #Evolution #DuckFacts",
            ),
            tweet(
                "BirdWatcher Supreme",
                "Fascinating how evolution shapes creatures for survival. Ducks' bills are a prime \
                 example of adaptability and efficiency in the animal kingdom. 🌿🦆 #NatureIsAmazing",
            ),
            tweet(
                "Pond Philosopher",
                "Ever noticed how ducks can filter water and mud right through their bills to find \
                 food? It's like having a built-in spaghetti strainer. Evolution is wild! 🍝🦆",
            ),
            tweet(
                "Nature's Marvels",
                "The variety in bill shapes even among ducks is a testament to evolutionary \
                 adaptation. From broad bills to narrow ones, each is tailored to their specific \
                 diet and habitat. #Biodiversity",
            ),
            tweet(
                "The Quacken",
                "Ducks also use their bills for grooming and to regulate their temperature, showing \
                 just how important this tool is beyond just feeding. It's their multi-purpose \
                 gadget! 🌡️🛁",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use gptweeter_ai::{
        AiResponse, ChatBackend, GenerationParams, Message, ModelRegistry, RetryPolicy,
        TokenUsage,
    };
    use gptweeter_config::ProviderKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    struct Replies {
        replies: Mutex<VecDeque<Result<String, AiError>>>,
        calls: Mutex<u32>,
    }

    impl Replies {
        fn new(replies: Vec<Result<String, AiError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ChatBackend for Replies {
        async fn complete(
            &self,
            _model: &str,
            _messages: &[Message],
            _params: &GenerationParams,
        ) -> Result<AiResponse, AiError> {
            *self.calls.lock().unwrap() += 1;
            let content = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("not json".to_string()))?;
            Ok(AiResponse {
                content,
                usage: TokenUsage::default(),
            })
        }
    }

    fn engine(backend: Arc<Replies>) -> ChatEngine {
        ChatEngine::new(
            ModelRegistry::builtin(),
            RetryPolicy::new(1, Duration::ZERO),
            "gpt-4-turbo-preview",
        )
        .unwrap()
        .with_backend(ProviderKind::Groq, backend)
    }

    const GOOD_FEED: &str = r#"{"tweets": [{"user_name": "Duckworth", "datetime": "2h ago", "text": "Quack."}]}"#;

    #[test]
    fn parses_plain_json() {
        let feed = parse_feed(GOOD_FEED).unwrap();
        assert_eq!(feed.tweets.len(), 1);
        assert_eq!(feed.tweets[0].user_name, "Duckworth");
    }

    #[test]
    fn strips_code_fences() {
        let fenced = format!("```{GOOD_FEED}```");
        assert_eq!(parse_feed(&fenced).unwrap(), parse_feed(GOOD_FEED).unwrap());

        let tagged = format!("```json\n{GOOD_FEED}\n```");
        assert_eq!(parse_feed(&tagged).unwrap(), parse_feed(GOOD_FEED).unwrap());
    }

    #[test]
    fn tolerates_raw_newlines_in_strings() {
        let reply = "{\"tweets\": [{\"user_name\": \"A\", \"datetime\": \"now\", \"text\": \"line one\nline two\"}]}";
        let feed = parse_feed(reply).unwrap();
        assert_eq!(feed.tweets[0].text, "line one\nline two");
    }

    #[test]
    fn escaped_quotes_stay_intact() {
        let reply = r#"{"tweets": [{"user_name": "A", "datetime": "now", "text": "say \"quack\"\\"}]}"#;
        let feed = parse_feed(reply).unwrap();
        assert_eq!(feed.tweets[0].text, "say \"quack\"\\");
    }

    #[test]
    fn malformed_reply_is_error() {
        assert!(matches!(
            parse_feed("Sure! Here are some tweets:"),
            Err(AiError::MalformedProviderResponse(_))
        ));
        assert!(parse_feed(r#"{"posts": []}"#).is_err());
    }

    #[test]
    fn prompt_uses_given_topic() {
        let mut rng = StdRng::seed_from_u64(7);
        let prompt = TweetPrompt::random(Some("ducks"), &mut rng);
        assert_eq!(prompt.topic, "ducks");
        assert!(TWEET_COUNTS.contains(&prompt.count));
        assert!(prompt.text().contains("about ducks in the style of"));
    }

    #[test]
    fn random_topic_comes_from_list() {
        let mut rng = StdRng::seed_from_u64(7);
        for topic in [None, Some("random"), Some("  ")] {
            let prompt = TweetPrompt::random(topic, &mut rng);
            assert!(TOPICS.contains(&prompt.topic.as_str()));
        }
    }

    #[tokio::test]
    async fn first_good_reply_wins() {
        let backend = Replies::new(vec![Ok(format!("```{GOOD_FEED}```"))]);
        let feed = generate_feed(&engine(backend.clone()), Some("ducks"), TWEET_MODEL).await;
        assert_eq!(feed.tweets[0].user_name, "Duckworth");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn retries_after_malformed_reply() {
        let backend = Replies::new(vec![Ok("oops".into()), Ok(GOOD_FEED.into())]);
        let feed = generate_feed(&engine(backend.clone()), None, TWEET_MODEL).await;
        assert_eq!(feed.tweets.len(), 1);
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn three_failures_serve_fallback() {
        let backend = Replies::new(vec![
            Ok("nope".into()),
            Err(AiError::Timeout),
            Ok("{\"tweets\": 5}".into()),
            Ok(GOOD_FEED.into()),
        ]);
        let feed = generate_feed(&engine(backend.clone()), None, TWEET_MODEL).await;
        assert_eq!(feed, fallback_feed());
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn missing_provider_serves_fallback() {
        let backend = Replies::new(vec![]);
        let feed = generate_feed(&engine(backend.clone()), None, "gpt-3.5-turbo").await;
        assert_eq!(feed, fallback_feed());
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn fallback_feed_has_five_tweets() {
        let feed = fallback_feed();
        assert_eq!(feed.tweets.len(), 5);
        assert!(feed.tweets.iter().all(|t| t.datetime == "Just now"));
    }
}
