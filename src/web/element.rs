//! `Element` over `web_sys::Element`

use crate::card::Element;
use crate::error::HydrateError;

use super::js_error;

impl Element for web_sys::Element {
    fn query_selector(&self, selector: &str) -> Result<Option<Self>, HydrateError> {
        web_sys::Element::query_selector(self, selector).map_err(|e| HydrateError::Dom(js_error(&e)))
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), HydrateError> {
        web_sys::Element::set_attribute(self, name, value).map_err(|e| HydrateError::Dom(js_error(&e)))
    }

    fn set_text_content(&self, text: &str) -> Result<(), HydrateError> {
        web_sys::Node::set_text_content(self, Some(text));
        Ok(())
    }
}
