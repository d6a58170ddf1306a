use std::time::Duration;

use reqwest::Client;

use serde::{Deserialize, Serialize};

use secrecy::Secret;

use url::Url;

/// REST client for the external payment processor.
///
/// This app never handles card data; it asks the processor for a payment
/// intent and records the confirmed outcome.
#[derive(Debug)]
pub struct PaymentClient {
    client: Client,

    api_intents_url: Url,
    api_secret_key: Secret<String>,
    currency: String,
}

impl PaymentClient {
    pub fn new(
        api_timeout: Duration,
        api_base_url: Url,
        api_secret_key: Secret<String>,
        currency: String,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(api_timeout).build()?;

        let api_intents_url = api_base_url.join("v1/payment_intents")?;

        Ok(Self {
            client,
            api_intents_url,
            api_secret_key,
            currency,
        })
    }

    /// Create a payment intent for the given amount.
    /// The returned client secret is handed to the paying client; the intent
    /// id is what this app stores once the charge is confirmed.
    #[tracing::instrument(name = "Create a payment intent", skip(self))]
    pub async fn create_intent(&self, amount_cents: i64) -> reqwest::Result<PaymentIntent> {
        use secrecy::ExposeSecret;

        let body = CreateIntentRequest {
            amount: amount_cents,
            currency: &self.currency,
        };

        let intent = self
            .client
            .post(self.api_intents_url.clone())
            .bearer_auth(self.api_secret_key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(intent)
    }
}

#[derive(Debug, Serialize)]
struct CreateIntentRequest<'a> {
    amount: i64,
    currency: &'a str,
}

/// Processor response for a created intent
#[derive(Debug, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}
