use std::{
    collections::{HashMap, VecDeque},
    io::BufRead,
};

use tracing::{debug, trace};

use crate::{
    define::{classify, parse_expression, Expression, SyscallKey, Variant},
    errors::ExpressionError,
};

/// Pseudo syscalls that headers define with `__NR_` but aren't real syscalls.
/// They still resolve so other defines can reference them.
pub const NON_SYSCALLS: [&str; 5] = [
    "arch_specific_syscall",
    "Linux",
    "SYSCALL_MASK",
    "SYSCALL_BASE",
    "OABI_SYSCALL_BASE",
];

pub fn is_non_syscall(name: &str) -> bool {
    NON_SYSCALLS.contains(&name)
}

/// Name to number, iterated in the order names were first defined.
#[derive(Debug, Default)]
pub struct ResolutionStore {
    slots: HashMap<String, usize>,
    entries: Vec<(String, i64)>,
}

impl ResolutionStore {
    /// Last write wins, the previous number is handed back on a redefinition.
    pub fn resolve(&mut self, name: &str, value: i64) -> Option<i64> {
        match self.slots.get(name) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].1, value)),
            None => {
                self.slots.insert(name.to_owned(), self.entries.len());
                self.entries.push((name.to_owned(), value));
                None
            }
        }
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.slots.get(name).map(|&slot| self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A define stuck waiting on another, not yet defined, macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    pub dependent: SyscallKey,
    pub increment: i64,
}

#[derive(Debug, Default)]
pub struct PendingIndex {
    waiting: HashMap<SyscallKey, Vec<PendingEntry>>,
    // first time each key was awaited, for reporting
    order: Vec<SyscallKey>,
}

impl PendingIndex {
    pub fn register(&mut self, awaited: SyscallKey, entry: PendingEntry) {
        let entries = self.waiting.entry(awaited).or_insert_with_key(|awaited| {
            self.order.push(awaited.clone());
            Vec::new()
        });
        entries.push(entry);
    }

    /// Removes and returns everything waiting on `awaited`.
    pub fn take(&mut self, awaited: &SyscallKey) -> Vec<PendingEntry> {
        self.waiting.remove(awaited).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    /// Number of dependents still waiting, across all awaited keys.
    pub fn dependents(&self) -> usize {
        self.waiting.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SyscallKey, &[PendingEntry])> {
        self.order
            .iter()
            .filter_map(|key| Some((key, self.waiting.get(key)?.as_slice())))
    }
}

/// A macro that was resolved a second time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redefinition {
    pub key: SyscallKey,
    pub old: i64,
    pub new: i64,
}

/// A line that looked like a syscall define but couldn't be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line_number: usize,
    pub error: ExpressionError,
}

/// One row of final output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord<'a> {
    pub tag: &'a str,
    pub arch: &'a str,
    pub name: &'a str,
    pub value: i64,
}

/// The resolution engine, fed one line at a time.
#[derive(Debug, Default)]
pub struct Extractor {
    plain: ResolutionStore,
    wide: ResolutionStore,
    pending: PendingIndex,
    redefinitions: Vec<Redefinition>,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles one header line. Lines that aren't syscall defines are ignored.
    pub fn process_line(&mut self, line: &str) -> Result<(), ExpressionError> {
        let Some(define) = classify(line) else {
            return Ok(());
        };
        trace!(key = %define.key, value = define.value, "define");

        match parse_expression(define.value)? {
            Expression::Literal(value) => self.resolve_and_drain(define.key, value),
            Expression::Reference { target, increment } => match self.value_of(&target) {
                Some(base) => self.resolve_and_drain(define.key, base.wrapping_add(increment)),
                None => {
                    debug!(key = %define.key, awaiting = %target, "pending");
                    self.pending.register(
                        target,
                        PendingEntry {
                            dependent: define.key,
                            increment,
                        },
                    );
                }
            },
        }
        Ok(())
    }

    /// Runs every line of `reader` through the engine. Bad lines don't stop
    /// the run, they come back with their 1-based line numbers.
    ///
    /// Lines are decoded lossily, headers carry Latin-1 in comments.
    pub fn process_reader(&mut self, reader: impl BufRead) -> std::io::Result<Vec<LineError>> {
        let mut errors = Vec::new();
        for (index, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            if let Err(error) = self.process_line(&String::from_utf8_lossy(&line)) {
                errors.push(LineError {
                    line_number: index + 1,
                    error,
                });
            }
        }
        Ok(errors)
    }

    #[cfg(test)]
    pub fn is_resolved(&self, key: &SyscallKey) -> bool {
        self.store(key.variant).is_resolved(&key.name)
    }

    pub fn value_of(&self, key: &SyscallKey) -> Option<i64> {
        self.store(key.variant).value_of(&key.name)
    }

    pub fn plain(&self) -> &ResolutionStore {
        &self.plain
    }

    pub fn wide(&self) -> &ResolutionStore {
        &self.wide
    }

    pub fn pending(&self) -> &PendingIndex {
        &self.pending
    }

    pub fn take_redefinitions(&mut self) -> Vec<Redefinition> {
        std::mem::take(&mut self.redefinitions)
    }

    /// Final output rows: arch specific numbers first, then generic ones that
    /// have no arch specific counterpart. Pseudo syscalls are left out.
    pub fn records<'a>(&'a self, tag: &'a str, arch: &'a str) -> Vec<OutputRecord<'a>> {
        let wide_fallbacks = self
            .wide
            .iter()
            .filter(|(name, _)| !self.plain.is_resolved(name));
        self.plain
            .iter()
            .chain(wide_fallbacks)
            .filter(|(name, _)| !is_non_syscall(name))
            .map(|(name, value)| OutputRecord {
                tag,
                arch,
                name,
                value,
            })
            .collect()
    }

    fn store(&self, variant: Variant) -> &ResolutionStore {
        match variant {
            Variant::Plain => &self.plain,
            Variant::Wide => &self.wide,
        }
    }

    fn store_mut(&mut self, variant: Variant) -> &mut ResolutionStore {
        match variant {
            Variant::Plain => &mut self.plain,
            Variant::Wide => &mut self.wide,
        }
    }

    fn resolve(&mut self, key: &SyscallKey, value: i64) {
        debug!(%key, value, "resolved");
        if let Some(old) = self.store_mut(key.variant).resolve(&key.name, value) {
            self.redefinitions.push(Redefinition {
                key: key.clone(),
                old,
                new: value,
            });
        }
    }

    /// Resolves `key`, then everything that was waiting on it, breadth first,
    /// for as many hops as the chain goes.
    fn resolve_and_drain(&mut self, key: SyscallKey, value: i64) {
        self.resolve(&key, value);
        let mut queue = VecDeque::from([(key, value)]);
        while let Some((awaited, base)) = queue.pop_front() {
            for entry in self.pending.take(&awaited) {
                let value = base.wrapping_add(entry.increment);
                trace!(%awaited, dependent = %entry.dependent, value, "drained");
                self.resolve(&entry.dependent, value);
                queue.push_back((entry.dependent, value));
            }
        }
    }
}
