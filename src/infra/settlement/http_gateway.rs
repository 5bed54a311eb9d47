use crate::domain::models::booking::PaymentMethod;
use crate::domain::ports::{ChargeOutcome, SettlementGateway};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

pub struct HttpSettlementGateway {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpSettlementGateway {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct ChargePayload {
    amount: i64,
    method: String,
    payer_ref: String,
}

#[derive(Deserialize)]
struct ChargeResponse {
    external_reference: String,
    settled: bool,
}

#[async_trait]
impl SettlementGateway for HttpSettlementGateway {
    async fn charge(
        &self,
        amount: i64,
        method: PaymentMethod,
        payer_ref: &str,
    ) -> Result<ChargeOutcome, AppError> {
        let payload = ChargePayload {
            amount,
            method: method.as_str().to_string(),
            payer_ref: payer_ref.to_string(),
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Settlement service connection error: {}", e);
                error!("{}", msg);
                AppError::Settlement(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Settlement service refused the charge. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::Settlement(msg));
        }

        let body: ChargeResponse = res.json().await.map_err(|e| {
            let msg = format!("Settlement service returned an unreadable body: {}", e);
            error!("{}", msg);
            AppError::Settlement(msg)
        })?;

        Ok(ChargeOutcome {
            external_reference: body.external_reference,
            settled: body.settled,
        })
    }
}
