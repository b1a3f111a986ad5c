//! Hydrator: scan → group by feed → fetch → parse off-thread → frame-paced updates
//!
//! # Lifecycle
//! 1. `hydrate()` trips a one-shot latch; later calls return `None`
//! 2. One DOM scan for candidate cards, grouped by feed URL
//! 3. Groups run concurrently; each fetches once and parses in its own worker
//! 4. Each group's cards are updated through a `FrameQueue`
//!
//! Failures never escape: a failed group leaves its cards as rendered.

use futures::future::join_all;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use super::platform::Platform;
use super::report::{AbandonReason, GroupOutcome, HydrationReport};
use super::task::HydrationTask;
use crate::card::{CardUpdater, Element};
use crate::config::HydrationConfig;
use crate::console;
use crate::error::HydrateError;
use crate::feed::FeedDatabase;
use crate::schedule::FrameQueue;
use crate::worker::round_trip;

/// Cards sharing one feed URL, in document order
#[derive(Debug, Clone)]
pub struct CardGroup<E> {
    pub src: String,
    pub cards: Vec<E>,
}

pub struct Hydrator<P: Platform> {
    platform: P,
    config: HydrationConfig,
    updater: CardUpdater,
    started: Cell<bool>,
}

impl<P: Platform> Hydrator<P> {
    pub fn new(platform: P, config: HydrationConfig) -> Self {
        let updater = CardUpdater::from_config(&config);
        Self {
            platform,
            config,
            updater,
            started: Cell::new(false),
        }
    }

    pub fn config(&self) -> &HydrationConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// True once `hydrate()` has been called
    pub fn has_started(&self) -> bool {
        self.started.get()
    }

    /// Run hydration once per page life. Returns `None` on every call after the first.
    pub async fn hydrate(&self) -> Option<HydrationReport> {
        if self.started.replace(true) {
            console::debug("hydration already started, ignoring trigger");
            return None;
        }
        let report = self.run().await;
        console::debug(&format!(
            "hydrated {} card(s) across {} group(s), {} abandoned",
            report.cards_updated,
            report.groups,
            report.abandoned.len()
        ));
        Some(report)
    }

    async fn run(&self) -> HydrationReport {
        let mut report = HydrationReport::default();

        let cards = match self.platform.query_cards(&self.config.card_selector) {
            Ok(cards) => cards,
            Err(e) => {
                console::warn(&format!("card scan failed: {}", e));
                return report;
            }
        };
        report.cards_scanned = cards.len();

        let groups = self.group_cards(cards);
        report.groups = groups.len();

        let outcomes = join_all(groups.into_iter().map(|group| self.hydrate_group(group))).await;
        for outcome in outcomes {
            report.absorb(outcome);
        }
        report
    }

    /// Group cards by feed URL, keeping first-appearance order of URLs and
    /// document order of cards. Cards without a SKU or feed URL are skipped.
    pub fn group_cards(&self, cards: Vec<P::Element>) -> Vec<CardGroup<P::Element>> {
        let mut groups: Vec<CardGroup<P::Element>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for card in cards {
            let sku = card.attribute(&self.config.sku_attribute).filter(|s| !s.is_empty());
            let src = card.attribute(&self.config.src_attribute).filter(|s| !s.is_empty());
            let (Some(_), Some(src)) = (sku, src) else {
                continue;
            };

            match index.get(&src) {
                Some(&i) => groups[i].cards.push(card),
                None => {
                    index.insert(src.clone(), groups.len());
                    groups.push(CardGroup { src, cards: vec![card] });
                }
            }
        }
        groups
    }

    async fn hydrate_group(&self, group: CardGroup<P::Element>) -> GroupOutcome {
        let db = match self.load_database(&group.src).await {
            Ok(db) => Rc::new(db),
            Err(e) => {
                console::debug(&format!("abandoning {}: {}", group.src, e));
                return GroupOutcome::Abandoned {
                    reason: AbandonReason::from(&e),
                    src: group.src,
                };
            }
        };

        let mut queue = FrameQueue::new(self.config.tasks_per_frame);
        queue.extend(group.cards.into_iter().map(|card| {
            HydrationTask::new(card, db.clone(), &self.config.sku_attribute, &self.updater).into_task()
        }));

        GroupOutcome::Hydrated {
            src: group.src,
            queue: queue.drain(&self.platform).await,
        }
    }

    /// Fetch the feed and parse it in a worker bounded by the configured timeout
    async fn load_database(&self, src: &str) -> Result<FeedDatabase, HydrateError> {
        let text = self.platform.fetch_text(src).await?;
        if text.trim().is_empty() {
            return Err(HydrateError::EmptyFeed);
        }

        let timeout_ms = self.config.worker_timeout_ms;
        round_trip(
            || self.platform.spawn_worker(&self.config.worker_url),
            text,
            self.platform.sleep(timeout_ms),
            timeout_ms,
        )
        .await
    }
}
