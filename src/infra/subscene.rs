use log::{debug, warn};
use reqwest::blocking::{Client, Response};
use scraper::{ElementRef, Html, Selector};
use std::io::Write;
use std::time::Duration;

use super::SubtitleIndex;
use crate::domain::models::{Rating, SearchRow};
use crate::error::{Result, SubDlError};

const BASE_URL: &str = "https://subscene.com";

pub struct SubsceneClient {
    client: Client,
    base_url: String,
}

impl SubsceneClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        // Requests block until the site answers.
        let client = Client::builder()
            .user_agent(concat!("sub-dl/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> Result<Response> {
        let url = self.url(path);
        debug!("GET {url}");
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(SubDlError::HttpStatus {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(response)
    }

    fn fetch_html(&self, path: &str) -> Result<String> {
        Ok(self.get(path)?.text()?)
    }
}

impl SubtitleIndex for SubsceneClient {
    fn search(&self, release_name: &str) -> Result<Vec<SearchRow>> {
        let encoded = urlencoding::encode(release_name);
        let html = self.fetch_html(&format!("/subtitles/release?q={encoded}"))?;
        let rows = parse_search_results(&html)?;
        debug!("{} result rows for {release_name}", rows.len());
        Ok(rows)
    }

    fn rating(&self, link: &str) -> Result<Option<Rating>> {
        let html = self.fetch_html(link)?;
        parse_rating(&html)
    }

    fn download(&self, link: &str, out: &mut dyn Write) -> Result<u64> {
        let html = self.fetch_html(link)?;
        let target = parse_download_link(&html)?;
        let mut response = self.get(&target)?;
        Ok(response.copy_to(out)?)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| SubDlError::Parse(e.to_string()))
}

fn text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Rows of the release search table. The first row is the table header.
pub fn parse_search_results(html: &str) -> Result<Vec<SearchRow>> {
    let document = Html::parse_document(html);
    let row_selector = selector("tr")?;
    let name_cell_selector = selector("td.a1")?;
    let hi_cell_selector = selector("td.a41")?;
    let span_selector = selector("span")?;
    let a_selector = selector("a")?;

    let mut rows = Vec::new();
    for row in document.select(&row_selector).skip(1) {
        let Some(cell) = row.select(&name_cell_selector).next() else {
            continue;
        };
        let mut spans = cell.select(&span_selector);
        let (Some(language), Some(release_name)) = (spans.next(), spans.next()) else {
            continue;
        };
        let Some(link) = cell
            .select(&a_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };

        rows.push(SearchRow {
            language: text(language),
            release_name: text(release_name),
            link: link.to_string(),
            hearing_impaired: row.select(&hi_cell_selector).next().is_some(),
        });
    }

    Ok(rows)
}

/// Score and vote count from the ratings widget. The vote count is the second
/// word of its `data-hint` attribute.
pub fn parse_rating(html: &str) -> Result<Option<Rating>> {
    let document = Html::parse_document(html);
    let rating_selector = selector("div.rating")?;
    let span_selector = selector("span")?;

    let Some(widget) = document.select(&rating_selector).next() else {
        return Ok(None);
    };

    let score = widget
        .select(&span_selector)
        .next()
        .and_then(|span| text(span).parse::<u32>().ok());
    let votes = widget
        .value()
        .attr("data-hint")
        .and_then(|hint| hint.split_whitespace().nth(1))
        .and_then(|count| count.parse::<u32>().ok());

    match (score, votes) {
        (Some(score), Some(votes)) => Ok(Some(Rating { score, votes })),
        _ => {
            warn!("Unreadable rating widget, treating subtitle as unrated");
            Ok(None)
        }
    }
}

pub fn parse_download_link(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let button_selector = selector("#downloadButton")?;

    document
        .select(&button_selector)
        .next()
        .and_then(|button| button.value().attr("href"))
        .map(|href| href.to_string())
        .ok_or_else(|| SubDlError::Parse("download button not found".to_string()))
}
