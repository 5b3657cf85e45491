//! Prebuilt styles
//!
//! A snapshot captures a list's bit mapping and its resolved declarations so a
//! build step can skip resolution entirely at runtime.

use crate::definition::MatcherValue;
use crate::error::{StyleError, StyleResult};
use crate::matcher::{BitTable, Mask};
use crate::resolver::DeclarationMap;
use crate::variants::ResolvedDefinition;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub name: String,
    pub value: MatcherValue,
    pub bit: Mask,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDefinition {
    pub mask: Mask,
    pub declarations: DeclarationMap,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylesSnapshot {
    #[serde(default)]
    pub mapping: Vec<MappingEntry>,
    #[serde(default)]
    pub definitions: Vec<SnapshotDefinition>,
}

impl StylesSnapshot {
    pub fn new(table: &BitTable, resolved: &[ResolvedDefinition]) -> Self {
        Self {
            mapping: table
                .entries()
                .map(|(name, value, bit)| MappingEntry {
                    name: name.to_string(),
                    value: value.clone(),
                    bit,
                })
                .collect(),
            definitions: resolved
                .iter()
                .map(|definition| SnapshotDefinition {
                    mask: definition.mask,
                    declarations: definition.declarations.as_ref().clone(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> StyleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> StyleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and split into a bit table and resolved definitions.
    ///
    /// Mapping bits must be single, consecutive bits in order, and every
    /// definition mask may only use mapped bits.
    pub fn into_parts(self) -> StyleResult<(BitTable, Vec<ResolvedDefinition>)> {
        for (index, entry) in self.mapping.iter().enumerate() {
            let expected = (1 as Mask).checked_shl(index as u32).unwrap_or(0);
            if expected == 0 || entry.bit != expected {
                return Err(StyleError::invalid_snapshot(format!(
                    "mapping entry {}={} has bit {}, expected {}",
                    entry.name, entry.value, entry.bit, expected
                )));
            }
        }

        let mapped = self.mapping.len();
        let table = BitTable::from_pairs(
            self.mapping
                .into_iter()
                .map(|entry| (entry.name, entry.value)),
        );
        if table.len() != mapped {
            return Err(StyleError::invalid_snapshot(
                "mapping lists the same condition twice",
            ));
        }

        let full = table.full_mask();
        let mut resolved = Vec::with_capacity(self.definitions.len());
        for (index, definition) in self.definitions.into_iter().enumerate() {
            if definition.mask & !full != 0 {
                return Err(StyleError::invalid_snapshot(format!(
                    "definition {} uses unmapped bits in mask {}",
                    index, definition.mask
                )));
            }
            resolved.push(ResolvedDefinition {
                mask: definition.mask,
                declarations: Rc::new(definition.declarations),
            });
        }

        Ok((table, resolved))
    }
}
