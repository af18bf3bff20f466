//! Service detail dialog state.
//!
//! The dialog is either closed or open on exactly one record; there is no
//! way to be open without a record or hold a record while closed.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::catalog::ServiceRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "service")]
pub enum ServiceDialog {
    #[default]
    Closed,
    Open(Arc<ServiceRecord>),
}

impl ServiceDialog {
    /// Show `record`, replacing any record already shown
    pub fn open(&mut self, record: Arc<ServiceRecord>) {
        debug!(service = %record.slug, "Service dialog opened");
        *self = Self::Open(record);
    }

    pub fn close(&mut self) {
        if self.is_open() {
            debug!("Service dialog closed");
        }
        *self = Self::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// The record being shown, only while open
    pub fn selected(&self) -> Option<&Arc<ServiceRecord>> {
        match self {
            Self::Open(record) => Some(record),
            Self::Closed => None,
        }
    }
}
