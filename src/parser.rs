use crate::types::EventRecord;

use scraper::{ElementRef, Html, Selector};

const CONTAINER_SELECTOR: &str = "div.event";
const TITLE_SELECTOR: &str = "h3";
const DATE_SELECTOR: &str = "div[class*='event-date']";
const LOCATION_SELECTOR: &str = "div[class*='event-location']";
const LINK_SELECTOR: &str = "a";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing required field: {0}")]
    MissingField(String),
}

struct EventSelectors {
    title: Selector,
    date: Selector,
    location: Selector,
    link: Selector,
}

impl EventSelectors {
    fn new() -> Self {
        Self {
            title: Selector::parse(TITLE_SELECTOR).unwrap(),
            date: Selector::parse(DATE_SELECTOR).unwrap(),
            location: Selector::parse(LOCATION_SELECTOR).unwrap(),
            link: Selector::parse(LINK_SELECTOR).unwrap(),
        }
    }
}

/// Extracts every event container on the page, in document order.
///
/// Containers missing a heading, date, location or anchor are skipped with a
/// warning; the remaining events are still returned.
pub fn parse_event_list(html: &str) -> Vec<EventRecord> {
    let document = Html::parse_document(html);
    let container_selector = Selector::parse(CONTAINER_SELECTOR).unwrap();
    let selectors = EventSelectors::new();

    let mut events = Vec::new();

    for element in document.select(&container_selector) {
        match parse_event(element, &selectors) {
            Ok(event) => events.push(event),
            Err(e) => {
                log::warn!("Skipping malformed event container: {}", e);
            }
        }
    }

    log::debug!("Extracted {} event(s)", events.len());

    events
}

fn parse_event(element: ElementRef, selectors: &EventSelectors) -> Result<EventRecord, ParseError> {
    let title = first_text(element, &selectors.title, "title")?;
    let date = first_text(element, &selectors.date, "date")?;
    let location = first_text(element, &selectors.location, "location")?;

    let link = element
        .select(&selectors.link)
        .next()
        .ok_or_else(|| ParseError::MissingField(format!("link in event '{}'", title)))?
        .value()
        .attr("href")
        .unwrap_or_default()
        .trim()
        .to_string();

    Ok(EventRecord::new(title, date, location, link))
}

fn first_text(element: ElementRef, selector: &Selector, field: &str) -> Result<String, ParseError> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .ok_or_else(|| ParseError::MissingField(field.to_string()))
}
