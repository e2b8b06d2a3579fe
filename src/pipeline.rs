use crate::config::Settings;
use crate::filter::LocationFilter;
use crate::notifier::{MailTransport, Notifier, NotifyOutcome};
use crate::parser::parse_event_list;
use crate::scraper::{PageFetcher, ScraperError};
use crate::types::EventRecord;

/// How a run ended. Every variant is a normal completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    FetchFailed(String),
    NoMatches,
    Notified(NotifyOutcome),
}

/// Fetch, extract, filter, notify; once per call to [`Pipeline::run`].
pub struct Pipeline<F, T> {
    fetcher: F,
    filter: LocationFilter,
    notifier: Notifier<T>,
}

impl<F: PageFetcher, T: MailTransport> Pipeline<F, T> {
    pub fn new(fetcher: F, filter: LocationFilter, notifier: Notifier<T>) -> Self {
        Self {
            fetcher,
            filter,
            notifier,
        }
    }

    pub fn from_settings(fetcher: F, transport: T, settings: &Settings) -> Self {
        Self::new(
            fetcher,
            LocationFilter::new(settings.location_target.clone()),
            Notifier::new(
                transport,
                settings.credentials.clone(),
                settings.subject.clone(),
            ),
        )
    }

    pub fn notifier(&self) -> &Notifier<T> {
        &self.notifier
    }

    /// Events matching the location filter, in page order.
    pub async fn matching_events(&self) -> Result<Vec<EventRecord>, ScraperError> {
        let html = self.fetcher.fetch_page().await?;
        let events = parse_event_list(&html);
        let total = events.len();
        let matches = self.filter.apply(events);

        log::info!(
            "Found {} of {} event(s) in '{}'",
            matches.len(),
            total,
            self.filter.target
        );

        Ok(matches)
    }

    pub async fn run(&self) -> RunOutcome {
        let events = match self.matching_events().await {
            Ok(events) => events,
            Err(e) => {
                log::error!("Error fetching hackathons: {}", e);
                return RunOutcome::FetchFailed(e.to_string());
            }
        };

        if events.is_empty() {
            log::info!("No hackathons found.");
            return RunOutcome::NoMatches;
        }

        let lines: Vec<String> = events.iter().map(ToString::to_string).collect();

        RunOutcome::Notified(self.notifier.notify(&lines).await)
    }
}
