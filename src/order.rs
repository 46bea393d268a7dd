//! Validated subscription order assembly

use std::sync::Arc;

use tracing::{debug, info};

use crate::directory::IdentityValidator;
use crate::error::AppResult;
use crate::form::{normalizer, FormSource};
use crate::models::SubscriptionOrder;

/// Fetches a form response, normalizes it and checks every contact address.
pub struct OrderService {
    forms: Arc<dyn FormSource>,
    validator: Arc<dyn IdentityValidator>,
}

impl OrderService {
    pub fn new(forms: Arc<dyn FormSource>, validator: Arc<dyn IdentityValidator>) -> Self {
        Self { forms, validator }
    }

    /// Build the order for `key`, failing on the first unparsable field or unknown contact.
    pub async fn get_validated_order(&self, key: &str) -> AppResult<SubscriptionOrder> {
        let answers = self.forms.fetch_answers(key).await?;
        let order = normalizer::normalize(&answers)?;

        for (field, contacts) in order.contact_lists() {
            for email in contacts {
                debug!(key, field, email = %email, "Validating contact");
                self.validator.exists(email).await?;
            }
        }

        info!(key, subscription = %order.subscription_name, "Subscription order validated");
        Ok(order)
    }
}
