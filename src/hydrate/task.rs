//! HydrationTask: one card bound to its group's feed database

use std::rc::Rc;

use crate::card::{CardUpdater, Element, FieldSet};
use crate::error::HydrateError;
use crate::feed::FeedDatabase;
use crate::schedule::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Record found and applied; may still be empty if no target matched
    Updated(FieldSet),
    /// Card SKU absent from the feed; card left as rendered
    RecordNotFound,
    /// Card lost its SKU attribute before the task ran
    MissingSku,
}

pub struct HydrationTask<'a, E: Element> {
    card: E,
    db: Rc<FeedDatabase>,
    sku_attribute: &'a str,
    updater: &'a CardUpdater,
}

impl<'a, E: Element + 'a> HydrationTask<'a, E> {
    pub fn new(card: E, db: Rc<FeedDatabase>, sku_attribute: &'a str, updater: &'a CardUpdater) -> Self {
        Self { card, db, sku_attribute, updater }
    }

    pub fn run(self) -> Result<TaskOutcome, HydrateError> {
        let Some(sku) = self.card.attribute(self.sku_attribute).filter(|s| !s.is_empty()) else {
            return Ok(TaskOutcome::MissingSku);
        };
        match self.db.get(&sku) {
            Some(record) => Ok(TaskOutcome::Updated(self.updater.apply(&self.card, Some(record)))),
            None => Ok(TaskOutcome::RecordNotFound),
        }
    }

    pub fn into_task(self) -> Task<'a, TaskOutcome> {
        Box::new(move || self.run())
    }
}
