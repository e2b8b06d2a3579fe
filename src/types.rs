use std::fmt::Display;

/// One event as listed on the events page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub title: String,
    pub date: String,
    pub location: String,
    pub link: String,
}

impl EventRecord {
    pub fn new(title: String, date: String, location: String, link: String) -> Self {
        Self {
            title,
            date,
            location,
            link,
        }
    }
}

impl Display for EventRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} - {} - {}",
            self.title, self.date, self.location, self.link
        )
    }
}
