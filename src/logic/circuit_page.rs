//! Navigation into a circuit view and the live tournament subscription.
//!
//! The controller holds at most one subscription. Every navigation cancels
//! the previous one before anything else happens.

use crate::models::Circuit;
use crate::store::{StoreError, Subscription};
use async_trait::async_trait;

/// What the controller needs from its environment.
#[async_trait]
pub trait CircuitPageDependencies: Send + Sync {
    async fn fetch_circuit(&self, slug: &str) -> Result<Option<Circuit>, StoreError>;
    fn render_circuit_view(&self, circuit: &Circuit, is_admin: bool);
    fn render_admins(&self, circuit: &Circuit, is_admin: bool);
    fn show_landing(&self);
    fn notify(&self, message: &str);
    fn current_user_id(&self) -> Option<String>;
    fn subscribe_tournament(&self, slug: &str) -> Subscription;
}

/// Result of a navigation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PageOutcome {
    Shown,
    /// Landing page shown instead.
    NotFound,
    Unavailable,
}

pub struct CircuitPageController<D: CircuitPageDependencies> {
    deps: D,
    circuit: Option<Circuit>,
    is_admin: bool,
    subscription: Option<Subscription>,
    tournament_slug: Option<String>,
}

impl<D: CircuitPageDependencies> CircuitPageController<D> {
    pub fn new(deps: D) -> Self {
        Self {
            deps,
            circuit: None,
            is_admin: false,
            subscription: None,
            tournament_slug: None,
        }
    }

    pub fn deps(&self) -> &D {
        &self.deps
    }

    pub fn circuit(&self) -> Option<&Circuit> {
        self.circuit.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Slug of the tournament currently watched, if any.
    pub fn watching(&self) -> Option<&str> {
        self.subscription
            .as_ref()
            .filter(|s| s.is_active())
            .and(self.tournament_slug.as_deref())
    }

    pub async fn enter_circuit(&mut self, slug: &str) -> PageOutcome {
        self.leave();
        self.is_admin = false;

        let slug = slug.trim();
        if slug.is_empty() {
            self.circuit = None;
            self.deps.show_landing();
            return PageOutcome::NotFound;
        }
        let circuit = match self.deps.fetch_circuit(slug).await {
            Ok(Some(circuit)) => circuit,
            Ok(None) | Err(StoreError::NotFound(_)) => {
                self.circuit = None;
                self.deps.notify("Circuit not found.");
                self.deps.show_landing();
                return PageOutcome::NotFound;
            }
            Err(e) => {
                log::warn!("Failed to load circuit {}: {}", slug, e);
                self.circuit = None;
                self.deps.notify("Could not load circuit.");
                self.deps.show_landing();
                return PageOutcome::Unavailable;
            }
        };

        let uid = self.deps.current_user_id();
        self.is_admin = circuit.is_admin(uid.as_deref());
        self.deps.render_admins(&circuit, self.is_admin);
        self.deps.render_circuit_view(&circuit, self.is_admin);
        self.circuit = Some(circuit);
        PageOutcome::Shown
    }

    /// Watch one tournament, replacing any earlier subscription.
    pub fn enter_tournament(&mut self, slug: &str) {
        if let Some(previous) = self.tournament_slug.as_deref() {
            log::debug!("Replacing subscription to {} with {}", previous, slug);
        }
        self.leave();
        self.subscription = Some(self.deps.subscribe_tournament(slug));
        self.tournament_slug = Some(slug.to_string());
    }

    /// Reload the current circuit.
    pub async fn refresh(&mut self) -> PageOutcome {
        match self.circuit.as_ref().map(|c| c.slug.clone()) {
            Some(slug) => self.enter_circuit(&slug).await,
            None => {
                self.deps.show_landing();
                PageOutcome::NotFound
            }
        }
    }

    /// Drop the live subscription, if there is one.
    pub fn leave(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.tournament_slug = None;
    }
}

impl<D: CircuitPageDependencies> Drop for CircuitPageController<D> {
    fn drop(&mut self) {
        self.leave();
    }
}
