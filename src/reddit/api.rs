use super::*;
use log::{debug, error, info};
use thiserror::Error;
use url::Url;

pub static REDDIT_BASE_URL: &str = "https://www.reddit.com";
pub static APP_USER_AGENT: &str = "Reddit Reader v0.13 (by /u/Ptk7l2)";

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("listing request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("listing request returned status {0}")]
    Status(u16),
    #[error("invalid listing url: {0}")]
    Url(#[from] url::ParseError),
}

pub fn get_client(user_agent: &str) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().user_agent(user_agent).build()
}

/// Listing endpoint for a subreddit, e.g. `/r/EarthPorn/new.json?limit=100`.
/// The limit is passed through as given.
pub fn listing_url(
    base_url: &str,
    subreddit: &str,
    sort: &str,
    limit: &str,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?.join(&format!("/r/{subreddit}/{sort}.json"))?;
    url.query_pairs_mut().append_pair("limit", limit);
    Ok(url)
}

/// Fetches the listing body. Anything but a 200 is an error.
pub async fn fetch_listing(client: &reqwest::Client, url: Url) -> Result<String, ListingError> {
    info!("getting listing {url}");
    let res = client.get(url).send().await?;

    let status = res.status();
    debug!("listing response status: {status}");
    if status != reqwest::StatusCode::OK {
        error!("listing request failed with status: {status}");
        return Err(ListingError::Status(status.as_u16()));
    }

    let body = res.text().await?;
    debug!("listing body length: {} bytes", body.len());
    Ok(body)
}

pub fn decode_listing(body: &str) -> Result<Vec<Post>, serde_json::Error> {
    let res = serde_json::from_str::<ListingResponse>(body)?;
    let posts: Vec<Post> = res.data.children.into_iter().map(|e| e.data).collect();
    info!("decoded {} post(s)", posts.len());
    Ok(posts)
}
