//! Thin wrapper around `lapin` (AMQP) for the raw-page handoff between the
//! fetcher (C1) and the article store (C2). Mirrors the original's
//! `aio_pika` usage: a durable queue, persistent messages, default
//! exchange, routing key = queue name (spec §6).

pub mod error;

use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicPublishOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tracing::{debug, warn};

pub use error::{QueueError, Result};
use newsline_common::RawPage;

/// AMQP delivery mode 2 = persistent (survives broker restart).
const PERSISTENT: u8 = 2;

pub struct RawPageQueue {
    channel: Channel,
    queue_name: String,
}

impl RawPageQueue {
    /// Connect to the broker and declare the durable queue. Idempotent:
    /// safe to call from every fetcher/store process at startup.
    pub async fn connect(uri: &str, queue_name: &str) -> Result<Self> {
        let conn = Connection::connect(uri, ConnectionProperties::default())
            .await
            .map_err(|e| QueueError::Connection(e.to_string()))?;
        let channel = conn.create_channel().await?;
        channel
            .queue_declare(
                queue_name,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        Ok(Self {
            channel,
            queue_name: queue_name.to_string(),
        })
    }

    /// Publish a raw page as a persistent message, routed directly to the
    /// named queue via the default exchange (spec §6).
    pub async fn publish(&self, page: &RawPage) -> Result<()> {
        let body = serde_json::to_vec(page)
            .map_err(|e| QueueError::Publish(format!("encoding message: {e}")))?;

        self.channel
            .basic_publish(
                "",
                &self.queue_name,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default().with_delivery_mode(PERSISTENT),
            )
            .await
            .map_err(|e| QueueError::Publish(e.to_string()))?
            .await
            .map_err(|e| QueueError::Publish(e.to_string()))?;

        debug!(url = %page.url, queue = %self.queue_name, "published raw page");
        Ok(())
    }

    /// Start consuming. Each delivery must be acked (via [`ack`]) only
    /// after the consumer's processing succeeds (spec §4.2), or nacked
    /// with requeue=false to drop a poison message (spec §12.4).
    pub async fn consume(&self, consumer_tag: &str) -> Result<lapin::Consumer> {
        let consumer = self
            .channel
            .basic_consume(
                &self.queue_name,
                consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;
        Ok(consumer)
    }
}

/// Decode a delivery's body into a [`RawPage`]. A decode failure is a
/// malformed message (spec §7); callers should ack-and-drop it rather than
/// letting the broker redeliver forever.
pub fn decode_raw_page(body: &[u8]) -> Result<RawPage> {
    serde_json::from_slice(body).map_err(|e| QueueError::MalformedBody(e.to_string()))
}

/// Acknowledge successful processing of a delivery.
pub async fn ack(delivery: &lapin::message::Delivery) -> Result<()> {
    delivery
        .ack(BasicAckOptions::default())
        .await
        .map_err(|e| QueueError::Publish(e.to_string()))
}

/// Drop a poison message after logging it (spec §7, §12.4): ack without
/// requeue so it is not redelivered.
pub async fn drop_poison_message(delivery: &lapin::message::Delivery, reason: &str) -> Result<()> {
    warn!(reason, "dropping poison message after ack");
    delivery
        .nack(BasicNackOptions {
            requeue: false,
            ..Default::default()
        })
        .await
        .map_err(|e| QueueError::Publish(e.to_string()))
}
