//! Navigation collaborator.

use std::collections::HashSet;
use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::error::{Result, TourError};
use crate::types::Role;

/// How a committed navigation reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationKind {
    /// Same section: location committed in place, pages swap without a reload.
    InPlace,
    /// Crossed a role section boundary: the host performs a full page load,
    /// tearing down every in-memory orchestrator.
    FullLoad,
}

pub trait Navigator: Send + Sync {
    /// Commit `path` as the new location and notify location observers.
    fn push(&self, path: &str) -> Result<NavigationKind>;

    fn current(&self) -> String;
}

/// In-process location history.
///
/// With a route table, pushing an unknown route fails the way a router with
/// no matching route would.
#[derive(Debug)]
pub struct History {
    routes: Option<HashSet<String>>,
    entries: Mutex<Vec<String>>,
    tx: broadcast::Sender<String>,
}

impl History {
    pub fn new(initial: impl Into<String>) -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            routes: None,
            entries: Mutex::new(vec![initial.into()]),
            tx,
        }
    }

    pub fn with_routes<I, S>(initial: impl Into<String>, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            routes: Some(routes.into_iter().map(Into::into).collect()),
            ..Self::new(initial)
        }
    }

    /// Location-change observers receive each committed path.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Navigator for History {
    fn push(&self, path: &str) -> Result<NavigationKind> {
        if !path.starts_with('/') {
            return Err(TourError::Navigation {
                path: path.to_string(),
                reason: "not an absolute route".to_string(),
            });
        }
        if let Some(routes) = &self.routes {
            if !routes.contains(path) {
                return Err(TourError::Navigation {
                    path: path.to_string(),
                    reason: "no matching route".to_string(),
                });
            }
        }

        let kind = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            let from = entries.last().cloned().unwrap_or_default();
            entries.push(path.to_string());
            if Role::for_path(&from) == Role::for_path(path) {
                NavigationKind::InPlace
            } else {
                NavigationKind::FullLoad
            }
        };
        let _ = self.tx.send(path.to_string());
        Ok(kind)
    }

    fn current(&self) -> String {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
            .unwrap_or_default()
    }
}
