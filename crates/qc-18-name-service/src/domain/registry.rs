//! # Alias Registry
//!
//! Authoritative name → owner and owner → name mappings plus the pending
//! application of each applicant. Single source of truth for the resolver.
//!
//! The registry is a plain state machine. It knows nothing about signatures
//! or transport; the ledger adapter serializes access and verifies
//! authorization before calling [`AliasRegistry::commit_status`].
//!
//! ## State Machine (per name)
//!
//! ```text
//! None ──create──→ Pending ──approve──→ Approved
//!                     │
//!                     ├──reject──→ None
//!                     └──duplicate create──→ Pending (EXISTS / NOT_ALLOWED)
//! Approved/None ──status tx──→ NOT_FOUND (no transition)
//! ```

use super::entities::{Address, Alias, AliasStatus, Application, FeeDescriptor, Timestamp};
use super::errors::AliasError;
use super::fee::FeeValidator;
use super::invariants::normalize_alias_name;
use super::status_tx::{StatusAction, StatusPayload};
use std::collections::{HashMap, HashSet};

/// Result of a committed status transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Alias name.
    pub name: String,
    /// Applicant the decision applied to.
    pub applicant: Address,
    /// `Approved` or `Rejected`.
    pub status: AliasStatus,
    /// Previous alias released by a re-approval.
    pub released: Option<String>,
}

/// In-memory alias registry.
#[derive(Debug)]
pub struct AliasRegistry {
    fee_validator: FeeValidator,
    max_name_length: usize,
    /// Pending and approved aliases by name.
    aliases: HashMap<String, Alias>,
    /// Pending applications by applicant.
    applications: HashMap<Address, Application>,
    /// Approved alias by owner.
    owners: HashMap<Address, String>,
    /// Addresses whose last application was rejected.
    restricted: HashSet<Address>,
    /// Serial of the last recorded application.
    last_serial: u64,
}

impl AliasRegistry {
    /// Create an empty registry.
    pub fn new(fee_validator: FeeValidator, max_name_length: usize) -> Self {
        Self {
            fee_validator,
            max_name_length,
            aliases: HashMap::new(),
            applications: HashMap::new(),
            owners: HashMap::new(),
            restricted: HashSet::new(),
            last_serial: 0,
        }
    }

    /// Normalize a name with this registry's rules.
    pub fn normalize(&self, name: &str) -> Result<String, AliasError> {
        normalize_alias_name(name, self.max_name_length)
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Record a pending application.
    ///
    /// Checks run in order: name rules, fee, name uniqueness (`EXISTS`), one
    /// pending application per applicant (`NOT_ALLOWED`).
    pub fn create_application(
        &mut self,
        name: &str,
        applicant: Address,
        fee: &FeeDescriptor,
        now: Timestamp,
    ) -> Result<Application, AliasError> {
        let name = self.normalize(name)?;
        let fee = self.fee_validator.validate_descriptor(fee)?;

        if self.aliases.contains_key(&name) {
            return Err(AliasError::AliasExists(name));
        }
        if self.applications.contains_key(&applicant) {
            return Err(AliasError::PendingApplicationExists(applicant));
        }

        self.last_serial += 1;
        let application = Application {
            name: name.clone(),
            applicant,
            fee,
            created_at: now,
            serial: self.last_serial,
        };
        self.aliases.insert(
            name.clone(),
            Alias {
                name,
                owner: applicant,
                status: AliasStatus::Pending,
            },
        );
        self.applications.insert(applicant, application.clone());
        Ok(application)
    }

    /// Apply an authorized status transaction.
    ///
    /// The referenced application must still be pending and match the
    /// payload's name, applicant and application id. Otherwise nothing
    /// changes and `NOT_FOUND` is returned.
    pub fn commit_status(&mut self, payload: &StatusPayload) -> Result<CommitOutcome, AliasError> {
        let not_found = || AliasError::ApplicationNotFound(payload.name.clone());

        let pending = self
            .aliases
            .get(&payload.name)
            .is_some_and(|a| a.status == AliasStatus::Pending && a.owner == payload.applicant);
        if !pending {
            return Err(not_found());
        }
        let matches = self.applications.get(&payload.applicant).is_some_and(|app| {
            app.name == payload.name && app.id() == payload.application_id
        });
        if !matches {
            return Err(not_found());
        }

        self.applications.remove(&payload.applicant);

        match payload.action {
            StatusAction::Approve => {
                let released = self.owners.insert(payload.applicant, payload.name.clone());
                if let Some(old) = &released {
                    self.aliases.remove(old);
                }
                if let Some(alias) = self.aliases.get_mut(&payload.name) {
                    alias.status = AliasStatus::Approved;
                }
                self.restricted.remove(&payload.applicant);
                Ok(CommitOutcome {
                    name: payload.name.clone(),
                    applicant: payload.applicant,
                    status: AliasStatus::Approved,
                    released,
                })
            }
            StatusAction::Reject => {
                self.aliases.remove(&payload.name);
                if !self.owners.contains_key(&payload.applicant) {
                    self.restricted.insert(payload.applicant);
                }
                Ok(CommitOutcome {
                    name: payload.name.clone(),
                    applicant: payload.applicant,
                    status: AliasStatus::Rejected,
                    released: None,
                })
            }
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Pending application of `applicant`.
    pub fn pending_application(&self, applicant: &Address) -> Option<&Application> {
        self.applications.get(applicant)
    }

    /// Pending application for `name` (already normalized).
    pub fn pending_by_name(&self, name: &str) -> Option<&Application> {
        let alias = self.aliases.get(name)?;
        if alias.status != AliasStatus::Pending {
            return None;
        }
        self.applications.get(&alias.owner)
    }

    /// Alias record for `name`.
    pub fn alias(&self, name: &str) -> Option<&Alias> {
        self.aliases.get(name)
    }

    /// Status of `name`; `None` when no record exists.
    pub fn status_of(&self, name: &str) -> AliasStatus {
        self.aliases
            .get(name)
            .map(|a| a.status)
            .unwrap_or(AliasStatus::None)
    }

    /// Forward lookup. Only approved aliases resolve.
    pub fn resolve_name(&self, name: &str) -> Result<Address, AliasError> {
        let name = self
            .normalize(name)
            .map_err(|_| AliasError::UnresolvedName(name.to_string()))?;
        match self.aliases.get(&name) {
            Some(alias) if alias.status == AliasStatus::Approved => Ok(alias.owner),
            _ => Err(AliasError::UnresolvedName(name)),
        }
    }

    /// Reverse lookup.
    ///
    /// `NOT_ALLOWED` when the address's last application was rejected and it
    /// owns no approved alias, `NOT_FOUND` otherwise.
    pub fn lookup_address(&self, address: &Address) -> Result<String, AliasError> {
        if let Some(name) = self.owners.get(address) {
            return Ok(name.clone());
        }
        if self.restricted.contains(address) {
            return Err(AliasError::LookupNotAllowed(*address));
        }
        Err(AliasError::AddressNotFound(*address))
    }

    /// Number of approved aliases.
    pub fn approved_count(&self) -> usize {
        self.owners.len()
    }

    /// Number of pending applications.
    pub fn pending_count(&self) -> usize {
        self.applications.len()
    }

    /// Check the structural invariants. Returns the first violation found.
    pub fn verify_consistency(&self) -> Result<(), String> {
        for (applicant, app) in &self.applications {
            match self.aliases.get(&app.name) {
                Some(a) if a.status == AliasStatus::Pending && a.owner == *applicant => {}
                other => {
                    return Err(format!(
                        "application {} for {} has alias {:?}",
                        app.name, applicant, other
                    ))
                }
            }
        }
        for (name, alias) in &self.aliases {
            match alias.status {
                AliasStatus::Pending => {
                    if self.applications.get(&alias.owner).map(|a| &a.name) != Some(name) {
                        return Err(format!("pending alias {name} has no application"));
                    }
                }
                AliasStatus::Approved => {
                    if self.owners.get(&alias.owner) != Some(name) {
                        return Err(format!("approved alias {name} missing from owners"));
                    }
                }
                status => return Err(format!("alias {name} stored with status {status:?}")),
            }
        }
        for (owner, name) in &self.owners {
            match self.aliases.get(name) {
                Some(a) if a.status == AliasStatus::Approved && a.owner == *owner => {}
                _ => return Err(format!("owner {owner} maps to non-approved alias {name}")),
            }
        }
        Ok(())
    }
}
