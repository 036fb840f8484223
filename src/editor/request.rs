use super::EditorSession;
use crate::error::{EditorError, GatewayError};
use crate::gateway::RecipeGateway;
use crate::recipe::RecipeTypeDocument;
use crate::validate::{ValidationReport, validate};
use tracing::{debug, info, warn};

/// Identifies one request issued by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Save,
    Validate,
}

/// A save or validate request handed to the caller to run against a gateway.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub kind: RequestKind,
    /// Snapshot of the recipe type when the request was issued.
    pub document: RecipeTypeDocument,
    revision: u64,
}

impl EditorSession {
    pub fn in_flight(&self) -> Option<&PendingRequest> {
        self.in_flight.as_ref()
    }

    /// Issues a request, failing while another one is outstanding.
    pub fn begin(&mut self, kind: RequestKind) -> Result<PendingRequest, EditorError> {
        if let Some(pending) = &self.in_flight {
            warn!(in_flight = ?pending.kind, requested = ?kind, "request refused");
            return Err(EditorError::RequestInFlight);
        }
        let request = PendingRequest {
            ticket: Ticket(self.next_ticket),
            kind,
            document: self.document(),
            revision: self.revision,
        };
        self.next_ticket += 1;
        self.in_flight = Some(request.clone());
        debug!(ticket = request.ticket.0, kind = ?kind, "request issued");
        Ok(request)
    }

    /// Forgets the outstanding request; its response will be ignored.
    pub fn abandon(&mut self) {
        if let Some(pending) = self.in_flight.take() {
            debug!(ticket = pending.ticket.0, "request abandoned");
        }
    }

    /// Takes the outstanding request if `ticket` of `kind` is it.
    fn settle(&mut self, ticket: Ticket, kind: RequestKind) -> Option<PendingRequest> {
        let current = self
            .in_flight
            .as_ref()
            .is_some_and(|pending| pending.ticket == ticket && pending.kind == kind);
        if current {
            return self.in_flight.take();
        }
        debug!(ticket = ticket.0, "ignoring stale response");
        None
    }

    /// Applies the response to a save request.
    ///
    /// Returns `Ok(None)` for a response that no longer belongs to the
    /// outstanding request.
    pub fn finish_save(
        &mut self,
        ticket: Ticket,
        response: Result<u64, GatewayError>,
    ) -> Result<Option<u64>, EditorError> {
        let Some(pending) = self.settle(ticket, RequestKind::Save) else {
            return Ok(None);
        };
        let id = response?;
        self.meta.id = Some(id);
        self.saved_revision = pending.revision;
        info!(id, name = %self.meta.name, "recipe type saved");
        Ok(Some(id))
    }

    /// Applies the response to a validate request, merged with the local
    /// warnings for the graph as it is now.
    pub fn finish_validate(
        &mut self,
        ticket: Ticket,
        response: Result<ValidationReport, GatewayError>,
    ) -> Result<Option<ValidationReport>, EditorError> {
        if self.settle(ticket, RequestKind::Validate).is_none() {
            return Ok(None);
        }
        let remote = response?;
        let mut report = validate(&self.graph);
        report.merge(remote);
        info!(warnings = report.warnings.len(), "recipe type validated");
        Ok(Some(report))
    }

    /// Saves through `gateway` and waits for the answer.
    pub fn save<G: RecipeGateway + ?Sized>(&mut self, gateway: &mut G) -> Result<u64, EditorError> {
        let request = self.begin(RequestKind::Save)?;
        let response = gateway.save(&request.document);
        self.finish_save(request.ticket, response)?
            .ok_or(EditorError::RequestInFlight)
    }

    /// Runs server-side validation through `gateway` together with the local
    /// checks.
    pub fn validate_remote<G: RecipeGateway + ?Sized>(
        &mut self,
        gateway: &G,
    ) -> Result<ValidationReport, EditorError> {
        let request = self.begin(RequestKind::Validate)?;
        let response = gateway.validate(&request.document.definition);
        self.finish_validate(request.ticket, response)?
            .ok_or(EditorError::RequestInFlight)
    }

    /// Local checks only; no request is issued.
    pub fn validate_local(&self) -> ValidationReport {
        validate(&self.graph)
    }
}
