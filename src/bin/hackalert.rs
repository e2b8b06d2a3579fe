use hackalert::config::Settings;
use hackalert::notifier::SmtpMailer;
use hackalert::{Pipeline, WebScraper};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let settings = Settings::load();
    log::debug!("Resolved settings: {:?}", settings);

    let scraper = match WebScraper::new(settings.events_url.clone()) {
        Ok(scraper) => scraper,
        Err(e) => {
            log::error!("Error creating scraper: {}", e);
            return;
        }
    };
    let mailer = SmtpMailer::new(settings.smtp_host.clone(), settings.smtp_port);

    let outcome = Pipeline::from_settings(scraper, mailer, &settings)
        .run()
        .await;

    log::debug!("Run finished: {:?}", outcome);
}
