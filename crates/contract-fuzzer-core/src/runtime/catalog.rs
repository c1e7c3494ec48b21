// crates/contract-fuzzer-core/src/runtime/catalog.rs
// ============================================================================
// Module: Contract Catalog
// Description: Read-only registry of endpoint contracts.
// Purpose: Resolve target signatures to validated contracts before fuzzing.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The catalog is built once from validated contracts and never mutated. It
//! hands out shared references so concurrent case executions can read the
//! same contract without synchronization. Resolution failures are
//! configuration errors scoped to a single target.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::core::ContractError;
use crate::core::ContractSpec;
use crate::core::EndpointSignature;
use crate::core::SignatureError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Catalog construction and lookup errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No contract is registered for the signature.
    #[error("unknown contract: {0}")]
    UnknownContract(String),
    /// Target string is not a valid endpoint signature.
    #[error("invalid target {target}: {source}")]
    InvalidTarget {
        /// Requested target.
        target: String,
        /// Parse failure.
        source: SignatureError,
    },
    /// Two contracts share a signature.
    #[error("duplicate contract: {0}")]
    DuplicateContract(EndpointSignature),
    /// A contract failed validation.
    #[error("invalid contract {signature}: {source}")]
    InvalidContract {
        /// Offending contract signature.
        signature: EndpointSignature,
        /// Validation failure.
        source: ContractError,
    },
}

// ============================================================================
// SECTION: Target Partition
// ============================================================================

/// Targets split into resolved contracts and rejections.
#[derive(Debug, Clone, Default)]
pub struct TargetPartition {
    /// Resolved contracts in request order.
    pub resolved: Vec<Arc<ContractSpec>>,
    /// Rejected targets in request order.
    pub rejected: Vec<(String, CatalogError)>,
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Read-only registry of contracts keyed by endpoint signature.
///
/// # Invariants
/// - Every registered contract passed [`ContractSpec::validate`].
/// - At most one contract per signature.
#[derive(Debug, Clone, Default)]
pub struct ContractCatalog {
    /// Contracts keyed by signature.
    contracts: BTreeMap<EndpointSignature, Arc<ContractSpec>>,
}

impl ContractCatalog {
    /// Builds a catalog from contracts, validating each one.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidContract`] or
    /// [`CatalogError::DuplicateContract`] when a contract is rejected.
    pub fn new(contracts: impl IntoIterator<Item = ContractSpec>) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for contract in contracts {
            contract.validate().map_err(|source| CatalogError::InvalidContract {
                signature: contract.signature.clone(),
                source,
            })?;
            let signature = contract.signature.clone();
            if map.contains_key(&signature) {
                return Err(CatalogError::DuplicateContract(signature));
            }
            map.insert(signature, Arc::new(contract));
        }
        Ok(Self {
            contracts: map,
        })
    }

    /// Returns the number of registered contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Returns true when no contracts are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Returns the contract registered for a parsed signature.
    #[must_use]
    pub fn get(&self, signature: &EndpointSignature) -> Option<&ContractSpec> {
        self.contracts.get(signature).map(AsRef::as_ref)
    }

    /// Resolves a `"METHOD /path"` target to its contract.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidTarget`] when the target does not parse
    /// and [`CatalogError::UnknownContract`] when nothing is registered for it.
    pub fn resolve(&self, target: &str) -> Result<Arc<ContractSpec>, CatalogError> {
        let signature: EndpointSignature =
            target.parse().map_err(|source| CatalogError::InvalidTarget {
                target: target.to_string(),
                source,
            })?;
        self.contracts
            .get(&signature)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownContract(signature.to_string()))
    }

    /// Resolves every target, preserving request order.
    #[must_use]
    pub fn resolve_all<T: AsRef<str>>(
        &self,
        targets: &[T],
    ) -> Vec<(String, Result<Arc<ContractSpec>, CatalogError>)> {
        targets
            .iter()
            .map(|target| {
                let target = target.as_ref();
                (target.to_string(), self.resolve(target))
            })
            .collect()
    }

    /// Splits targets into resolved contracts and rejections.
    #[must_use]
    pub fn partition_targets<T: AsRef<str>>(&self, targets: &[T]) -> TargetPartition {
        let mut partition = TargetPartition::default();
        for (target, resolved) in self.resolve_all(targets) {
            match resolved {
                Ok(contract) => partition.resolved.push(contract),
                Err(err) => partition.rejected.push((target, err)),
            }
        }
        partition
    }

    /// Returns registered signatures ordered by method, then path.
    #[must_use]
    pub fn signatures(&self) -> Vec<&EndpointSignature> {
        self.contracts.keys().collect()
    }

    /// Iterates registered contracts in signature order.
    pub fn contracts(&self) -> impl Iterator<Item = &ContractSpec> {
        self.contracts.values().map(AsRef::as_ref)
    }
}
