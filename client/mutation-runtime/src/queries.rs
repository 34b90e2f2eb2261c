//! Descriptor catalogue for the product's read operations.
//!
//! Inputs here are part of the cache contract: an invalidation only lands if
//! its descriptor carries exactly the input the reader fetched with.

use query_cache::QueryDescriptor;
use serde_json::json;

/// Page size the search screen fetches with.
pub const SEARCH_PAGE_SIZE: u64 = 10;

pub fn timeline() -> QueryDescriptor {
    QueryDescriptor::new("tweet.getTweets")
}

pub fn infinite_timeline() -> QueryDescriptor {
    QueryDescriptor::new("tweet.getInfiniteTweets")
}

/// Infinite timeline restricted to followed users.
pub fn following_timeline() -> QueryDescriptor {
    QueryDescriptor::new("tweet.getFollowingInfiniteTweets")
}

pub fn user_tweets(user_id: &str) -> QueryDescriptor {
    QueryDescriptor::with_input("tweet.getUserTweets", json!({ "userId": user_id, "link": "" }))
}

pub fn tweet_replies(tweet_id: &str) -> QueryDescriptor {
    QueryDescriptor::with_input("tweet.getTweetReplies", json!({ "tweetId": tweet_id }))
}

pub fn single_tweet(tweet_id: &str) -> QueryDescriptor {
    QueryDescriptor::with_input("tweet.getSingleTweet", json!({ "tweetId": tweet_id }))
}

pub fn search_tweets(term: &str, filtering: &str) -> QueryDescriptor {
    QueryDescriptor::with_input(
        "tweet.searchTweets",
        json!({ "term": term, "filtering": filtering, "limit": SEARCH_PAGE_SIZE }),
    )
}

/// Probe telling whether the acting user already retweeted this tweet.
pub fn already_retweeted(tweet_id: &str) -> QueryDescriptor {
    QueryDescriptor::with_input("tweet.userAlreadyRetweet", json!({ "tweetId": tweet_id }))
}

/// Probe telling whether the acting user already liked this tweet.
pub fn already_liked(tweet_id: &str) -> QueryDescriptor {
    QueryDescriptor::with_input("like.userLikeTweet", json!({ "tweetId": tweet_id }))
}

pub fn user_bookmarks() -> QueryDescriptor {
    QueryDescriptor::new("bookmark.getUserBookmarks")
}

pub fn already_bookmarked(tweet_id: &str) -> QueryDescriptor {
    QueryDescriptor::with_input("bookmark.userAlreadyBookmark", json!({ "bookmarkId": tweet_id }))
}

pub fn follower_recommendations() -> QueryDescriptor {
    QueryDescriptor::new("follow.getFollowersRecommendation")
}

/// Single follow edge from the acting user to `following_id`.
pub fn single_follower(following_id: &str) -> QueryDescriptor {
    QueryDescriptor::with_input("follow.getSingleFollower", json!({ "followingId": following_id }))
}

pub fn user_followers(user_id: &str) -> QueryDescriptor {
    QueryDescriptor::with_input("follow.getUserFollowers", json!({ "userId": user_id }))
}

pub fn user_following(user_id: &str) -> QueryDescriptor {
    QueryDescriptor::with_input("follow.getUserFollowing", json!({ "userId": user_id }))
}

pub fn user_profile(user_id: &str) -> QueryDescriptor {
    QueryDescriptor::with_input("user.getUserProfile", json!({ "userId": user_id }))
}

pub fn list_details(list_id: &str) -> QueryDescriptor {
    QueryDescriptor::with_input("list.getListDetails", json!({ "listId": list_id }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_input_same_slot() {
        assert_eq!(single_tweet("t1"), single_tweet("t1"));
        assert_ne!(single_tweet("t1"), single_tweet("t2"));
        assert_ne!(single_tweet("t1"), tweet_replies("t1"));
    }

    #[test]
    fn test_search_carries_page_size() {
        let d = search_tweets("rust", "latest");
        assert_eq!(d.input().unwrap()["limit"], SEARCH_PAGE_SIZE);
    }
}
