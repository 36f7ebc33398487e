//! Count-then-fetch fan-out over a [`Bridge`]
//!
//! The bridge only answers single-property reads. Collections are read by
//! counting the children at a path, then reading a fixed set of properties
//! from each child concurrently and assembling one [`Record`] per child.

use bridge_client::{Bridge, LiveValue};
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::operation::Operation;
use crate::path::LivePath;
use crate::record::{unexpected, FromRecord, Record};
use crate::{ApiError, Result};

/// Bounded, timeout-aware access to a bridge
///
/// Every read holds one permit of a semaphore sized by
/// [`ClientConfig::max_concurrent_reads`] for as long as it is in flight.
/// Permits are never held across a whole collection, so nested fan-outs
/// (devices, then parameters per device) cannot starve each other.
#[derive(Debug)]
pub struct Aggregator<B> {
    bridge: Arc<B>,
    permits: Arc<Semaphore>,
    read_timeout: Option<Duration>,
}

impl<B> Clone for Aggregator<B> {
    fn clone(&self) -> Self {
        Self {
            bridge: Arc::clone(&self.bridge),
            permits: Arc::clone(&self.permits),
            read_timeout: self.read_timeout,
        }
    }
}

impl<B: Bridge> Aggregator<B> {
    pub fn new(bridge: Arc<B>, config: &ClientConfig) -> Self {
        Self {
            bridge,
            permits: Arc::new(Semaphore::new(config.max_concurrent_reads)),
            read_timeout: config.read_timeout,
        }
    }

    pub fn bridge(&self) -> &Arc<B> {
        &self.bridge
    }

    /// Perform a read operation
    ///
    /// Only [`Operation::Get`] and [`Operation::Count`] produce values; any
    /// other kind fails with [`ApiError::UnsupportedOperation`] without
    /// contacting the bridge.
    pub async fn read(
        &self,
        operation: Operation,
        path: &LivePath,
        property: &str,
    ) -> Result<LiveValue> {
        let request = match operation {
            Operation::Get => self.bridge.get(path.as_str(), property),
            Operation::Count => self.bridge.count(path.as_str(), property),
            Operation::Set | Operation::Call => {
                return Err(ApiError::UnsupportedOperation(operation));
            }
        };

        // The semaphore is owned by self and never closed
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ApiError::Configuration("Read limiter closed".to_string()))?;

        let value = match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| ApiError::Timeout {
                    path: path.to_string(),
                    property: property.to_string(),
                    after: limit,
                })??,
            None => request.await?,
        };

        debug!(%operation, %path, property, %value, "Read completed");
        Ok(value)
    }

    pub async fn get(&self, path: &LivePath, property: &str) -> Result<LiveValue> {
        self.read(Operation::Get, path, property).await
    }

    /// Number of children under `property`
    pub async fn count(&self, path: &LivePath, property: &str) -> Result<usize> {
        let value = self.read(Operation::Count, path, property).await?;
        value
            .as_i64()
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| unexpected(property, "non-negative count", &value))
    }

    /// Fire-and-forget property write
    pub async fn write(&self, path: &LivePath, property: &str, value: LiveValue) -> Result<()> {
        self.bridge.set(path.as_str(), property, value).await?;
        Ok(())
    }

    /// Fire-and-forget `fire` call, as used to launch scenes and clips
    pub async fn trigger(&self, path: &LivePath) -> Result<()> {
        self.bridge.call(path.as_str(), "fire").await?;
        Ok(())
    }

    /// Read `field_names` from every child of `path` under `property`
    ///
    /// The result has exactly as many records as the count reported, ordered
    /// by index whatever order the reads complete in. If any read fails the
    /// whole call fails; no partial list is returned.
    #[instrument(skip(self, path, field_names), fields(path = %path))]
    pub async fn fetch_list(
        &self,
        path: &LivePath,
        property: &str,
        field_names: &[&str],
    ) -> Result<Vec<Record>> {
        let count = self.count(path, property).await?;
        debug!(count, fields = field_names.len(), "Fetching children");

        let children = (0..count)
            .map(|index| self.fetch_record(path.item(property, index), index, field_names));
        try_join_all(children).await
    }

    /// [`fetch_list`](Self::fetch_list) with the field list and conversion of `T`
    pub async fn fetch_typed<T: FromRecord>(
        &self,
        path: &LivePath,
        property: &str,
    ) -> Result<Vec<T>> {
        self.fetch_list(path, property, T::FIELDS)
            .await?
            .iter()
            .map(T::from_record)
            .collect()
    }

    async fn fetch_record(
        &self,
        child: LivePath,
        index: usize,
        field_names: &[&str],
    ) -> Result<Record> {
        let values = try_join_all(field_names.iter().map(|name| self.get(&child, name))).await?;
        let fields = field_names
            .iter()
            .map(|name| name.to_string())
            .zip(values)
            .collect();
        Ok(Record::new(index, fields))
    }
}
