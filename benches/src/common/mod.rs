#![allow(dead_code)]

use tagstream::prelude::*;

/// Generate a newline-delimited stream of tweet objects.
///
/// Every fifth tweet carries no hashtags and has braces inside its text; the
/// rest draw `tags_per_tweet` tags from a pool of `distinct_tags`.
pub fn generate_stream(num_tweets: usize, distinct_tags: usize, tags_per_tweet: usize) -> String {
    let mut body = String::with_capacity(num_tweets * 96);

    for i in 0..num_tweets {
        if i % 5 == 4 {
            body.push_str(&format!("{{\"data\":{{\"id\":\"{i}\",\"text\":\"plain {{tweet}}\"}}}}\r\n"));
            continue;
        }

        let hashtags: Vec<String> = (0..tags_per_tweet)
            .map(|j| format!("{{\"tag\":\"tag{}\"}}", (i * 7 + j * 13) % distinct_tags))
            .collect();
        body.push_str(&format!(
            "{{\"data\":{{\"id\":\"{i}\",\"entities\":{{\"hashtags\":[{}]}}}}}}\r\n",
            hashtags.join(",")
        ));
    }

    body
}

/// Create tweets drawing from a pool of `distinct_tags` tags
pub fn create_tweets(count: usize, distinct_tags: usize) -> Vec<Tweet> {
    (0..count)
        .map(|i| {
            let hashtags = vec![
                format!("tag{}", i % distinct_tags),
                format!("tag{}", (i * 31) % distinct_tags),
            ];
            Tweet::new(Some(i.to_string()), hashtags)
        })
        .collect()
}

/// Statistics pre-filled with `count` tweets
pub fn populated_statistics(count: usize, distinct_tags: usize) -> ConcurrentTweetStatistics {
    let statistics = ConcurrentTweetStatistics::new();
    for tweet in create_tweets(count, distinct_tags) {
        statistics.report(&tweet);
    }
    statistics
}
