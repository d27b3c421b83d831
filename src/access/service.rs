use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::gate::{GateEvent, GateMachine, GateState, Verdict};
use super::pin::{OwnerAccessToken, Pin};
use crate::constants::OWNER_ACCESS_KEY;
use crate::gateway::{Backend, Statement};
use crate::session::Session;
use crate::storage::{load_json, save_json, KeyValueStore};
use crate::utils::PartnerError;

/// Owner-access gate bound to the backend and device storage
///
/// Queries return verdicts; `apply` is the only place the gate moves, and it writes
/// `ownerAccess` whenever the held token changes.
pub struct OwnerAccess {
    backend: Arc<dyn Backend>,
    storage: Arc<dyn KeyValueStore>,
    gate: GateMachine,
}

impl OwnerAccess {
    pub fn new(backend: Arc<dyn Backend>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            storage,
            gate: GateMachine::new(),
        }
    }

    pub fn state(&self) -> GateState {
        self.gate.state()
    }

    pub fn token(&self) -> OwnerAccessToken {
        self.gate.token()
    }

    /// Cold start: pick up the stored token, `0` when absent or unreadable
    pub fn restore(&mut self) -> OwnerAccessToken {
        let token = match load_json::<Value>(self.storage.as_ref(), OWNER_ACCESS_KEY) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
            Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
            _ => 0,
        };

        // Restoring does not rewrite storage
        self.gate
            .apply(GateEvent::Restored(OwnerAccessToken::new(token)));
        self.token()
    }

    /// Ask whether the account has a PIN, re-checking a held token when it does
    ///
    /// A failed existence query leaves the gate where it was.
    pub async fn probe(&mut self, session: &Session) -> Result<GateState, PartnerError> {
        let token = session.token().ok_or(PartnerError::NotLoggedIn)?;

        let pin_exists = match self.backend.owner_pin_exists(token).await {
            Ok(reply) => reply.body.success,
            Err(e) => {
                warn!("Owner PIN lookup failed: {}", e);
                return Err(PartnerError::Internal);
            }
        };

        let held = self.token();
        let verdict = if pin_exists && held.is_unlocked() {
            Some(self.verdict(token, held).await)
        } else {
            None
        };

        self.apply(GateEvent::Probed {
            pin_exists,
            verdict,
        });
        Ok(self.state())
    }

    /// Passive re-check of the held token, run on entry to a protected screen
    ///
    /// Never prompts and never errors: any failure revokes the token.
    pub async fn revalidate(&mut self, session: &Session) -> GateState {
        let held = self.token();
        let Some(token) = session.token() else {
            return self.state();
        };
        if !held.is_unlocked() {
            return self.state();
        }

        let verdict = self.verdict(token, held).await;
        self.apply(GateEvent::Revalidated(verdict));
        self.state()
    }

    /// Unlock with an existing PIN
    ///
    /// Returns the server's message, if any. Failures leave the gate untouched.
    pub async fn enter_pin(
        &mut self,
        session: &Session,
        pin: &str,
    ) -> Result<Option<String>, PartnerError> {
        let pin = Pin::parse(pin)?;
        let token = session.token().ok_or(PartnerError::NotLoggedIn)?;

        let body = self
            .backend
            .enter_owner_pin(token, &pin)
            .await
            .map_err(|e| {
                warn!("Owner PIN entry failed: {}", e);
                PartnerError::from(e)
            })?
            .into_accepted()?;

        self.apply(GateEvent::Issued(body.token()));
        Ok(body.message)
    }

    /// Create the PIN; success unlocks immediately
    pub async fn set_pin(
        &mut self,
        session: &Session,
        pin: &str,
    ) -> Result<Option<String>, PartnerError> {
        let pin = Pin::parse(pin)?;
        let token = session.token().ok_or(PartnerError::NotLoggedIn)?;

        let body = self
            .backend
            .set_owner_pin(token, &pin)
            .await
            .map_err(|e| {
                warn!("Owner PIN creation failed: {}", e);
                PartnerError::from(e)
            })?
            .into_accepted()?;

        self.apply(GateEvent::Issued(body.token()));
        Ok(body.message)
    }

    /// Drop the unlock token locally
    pub fn disable(&mut self) -> GateState {
        self.apply(GateEvent::Disabled);
        self.state()
    }

    /// Enter a protected screen and load its data
    ///
    /// The held token is re-validated first; anything short of unlocked is refused.
    pub async fn fetch_statement(
        &mut self,
        session: &Session,
        statement: &Statement,
    ) -> Result<Value, PartnerError> {
        let token = session.token().ok_or(PartnerError::NotLoggedIn)?;
        if !self.revalidate(session).await.is_unlocked() {
            return Err(PartnerError::AccessLocked);
        }

        let body = self
            .backend
            .fetch_statement(token, statement, self.token())
            .await
            .map_err(|e| {
                warn!("Loading {:?} failed: {}", statement, e);
                PartnerError::from(e)
            })?
            .into_accepted()?;
        Ok(body.data)
    }

    async fn verdict(&self, session_token: &str, held: OwnerAccessToken) -> Verdict {
        match self.backend.check_owner_token(session_token, held).await {
            Ok(reply) if reply.is_accepted() => Verdict::Valid,
            Ok(reply) => {
                debug!("Owner token rejected (status {})", reply.status);
                Verdict::Rejected
            }
            Err(e) => {
                warn!("Owner token check failed, revoking: {}", e);
                Verdict::Rejected
            }
        }
    }

    fn apply(&mut self, event: GateEvent) {
        let transition = self.gate.apply(event);
        if transition.from != transition.to {
            info!("Owner access {:?} -> {:?}", transition.from, transition.to);
        }
        if transition.token_changed {
            save_json(self.storage.as_ref(), OWNER_ACCESS_KEY, &self.gate.token());
        }
    }
}
